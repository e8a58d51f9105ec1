// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Raw record sources and the concurrent fan-out fetch.
//!
//! Every record set is fetched independently. A source that fails is logged,
//! recorded as a [`PartialSourceFailure`] and treated as empty, so the rest
//! of the snapshot is still usable.

use anyhow::{Context, Result, anyhow, bail};
use csv::ReaderBuilder;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::PartialSourceFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Transactions,
    Students,
    Staff,
    Budgets,
    Accounts,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        SourceKind::Transactions,
        SourceKind::Students,
        SourceKind::Staff,
        SourceKind::Budgets,
        SourceKind::Accounts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SourceKind::Transactions => "transactions",
            SourceKind::Students => "students",
            SourceKind::Staff => "staff",
            SourceKind::Budgets => "budgets",
            SourceKind::Accounts => "accounts",
        }
    }

    /// REST path of the service that owns this record set.
    pub fn endpoint(self) -> &'static str {
        match self {
            SourceKind::Transactions => "/api/finance/transactions",
            SourceKind::Students => "/api/students",
            SourceKind::Staff => "/api/hr/staff",
            SourceKind::Budgets => "/api/finance/budgets",
            SourceKind::Accounts => "/api/finance/accounts",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything that can hand back an array of loosely-typed records.
pub trait RecordSource: Sync {
    fn fetch(&self, kind: SourceKind) -> Result<Vec<Value>>;
}

/// REST services behind the console gateway.
pub struct HttpSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: crate::utils::http_client()?,
        })
    }
}

impl RecordSource for HttpSource {
    fn fetch(&self, kind: SourceKind) -> Result<Vec<Value>> {
        let url = format!("{}{}", self.base_url, kind.endpoint());
        debug!(%url, "fetching {}", kind);
        let resp = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("GET {}", url))?
            .error_for_status()?;
        let body: Value = resp
            .json()
            .with_context(|| format!("Decode {} response", kind))?;
        into_array(body, kind)
    }
}

/// A directory of exported record sets: `<kind>.json` (array) or `<kind>.csv`.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_json(path: &Path, kind: SourceKind) -> Result<Vec<Value>> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Read {}", path.display()))?;
        let body: Value = serde_json::from_str(&text)
            .with_context(|| format!("Parse JSON {}", path.display()))?;
        into_array(body, kind)
    }

    fn read_csv(path: &Path) -> Result<Vec<Value>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("Open CSV {}", path.display()))?;
        let headers = rdr.headers()?.clone();
        let mut out = Vec::new();
        for result in rdr.records() {
            let rec = result?;
            let mut obj = Map::new();
            for (h, v) in headers.iter().zip(rec.iter()) {
                if !v.is_empty() {
                    obj.insert(h.to_string(), Value::String(v.to_string()));
                }
            }
            out.push(Value::Object(obj));
        }
        Ok(out)
    }
}

impl RecordSource for DirSource {
    fn fetch(&self, kind: SourceKind) -> Result<Vec<Value>> {
        let json = self.dir.join(format!("{}.json", kind.name()));
        if json.exists() {
            return Self::read_json(&json, kind);
        }
        let csv = self.dir.join(format!("{}.csv", kind.name()));
        if csv.exists() {
            return Self::read_csv(&csv);
        }
        bail!(
            "no {}.json or {}.csv in {}",
            kind.name(),
            kind.name(),
            self.dir.display()
        )
    }
}

fn into_array(body: Value, kind: SourceKind) -> Result<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        // Paged responses wrap the rows.
        Value::Object(mut obj) => match obj.remove("content").or_else(|| obj.remove("data")) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(anyhow!("{} payload is not an array", kind)),
        },
        _ => Err(anyhow!("{} payload is not an array", kind)),
    }
}

/// Raw record sets fetched once; everything downstream is recomputed from it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub transactions: Vec<Value>,
    pub students: Vec<Value>,
    pub staff: Vec<Value>,
    pub budgets: Vec<Value>,
    pub accounts: Vec<Value>,
    pub failures: Vec<PartialSourceFailure>,
}

impl Snapshot {
    pub fn records(&self, kind: SourceKind) -> &[Value] {
        match kind {
            SourceKind::Transactions => &self.transactions,
            SourceKind::Students => &self.students,
            SourceKind::Staff => &self.staff,
            SourceKind::Budgets => &self.budgets,
            SourceKind::Accounts => &self.accounts,
        }
    }

    fn slot(&mut self, kind: SourceKind) -> &mut Vec<Value> {
        match kind {
            SourceKind::Transactions => &mut self.transactions,
            SourceKind::Students => &mut self.students,
            SourceKind::Staff => &mut self.staff,
            SourceKind::Budgets => &mut self.budgets,
            SourceKind::Accounts => &mut self.accounts,
        }
    }

    pub fn set(&mut self, kind: SourceKind, rows: Vec<Value>) {
        *self.slot(kind) = rows;
    }

    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Fetch every requested kind concurrently and wait for all of them.
pub fn fetch_snapshot(source: &dyn RecordSource, kinds: &[SourceKind]) -> Snapshot {
    let results: Vec<(SourceKind, Result<Vec<Value>>)> = std::thread::scope(|s| {
        let handles: Vec<_> = kinds
            .iter()
            .map(|&kind| (kind, s.spawn(move || source.fetch(kind))))
            .collect();
        handles
            .into_iter()
            .map(|(kind, h)| {
                let res = h
                    .join()
                    .unwrap_or_else(|_| Err(anyhow!("fetch thread panicked")));
                (kind, res)
            })
            .collect()
    });

    let mut snap = Snapshot::default();
    for (kind, res) in results {
        match res {
            Ok(rows) => {
                info!(source = %kind, rows = rows.len(), "fetched");
                snap.set(kind, rows);
            }
            Err(e) => {
                let message = format!("{:#}", e);
                warn!(source = %kind, error = %message, "source unavailable; treating as empty");
                snap.failures.push(PartialSourceFailure {
                    source_kind: kind,
                    message,
                });
            }
        }
    }
    snap
}
