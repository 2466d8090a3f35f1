//! SQLite inventory store.
//!
//! `parts_received` holds one row per `vendor:sku` part key with running
//! totals; `parts_removed` is an append-only usage log; `orders_ingested`
//! remembers which orders already fed the totals. Money is written as decimal
//! text so totals stay exact, but numeric columns are read back whatever their
//! storage class, since older databases hold REAL quantities and spend.

use std::ops::AddAssign;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::receipt::{ParsedLineItem, ParsedOrder, ParsedReceipt};
use crate::vendors::coerce::{squash_whitespace, to_decimal};

/// Decimal places kept for average unit cost.
const AVG_COST_SCALE: u32 = 4;

/// Counts from writing one or more receipts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub items: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Items without a SKU; they cannot be keyed.
    pub skipped: usize,
    /// Items of orders that were already ingested; nothing was written.
    pub duplicates: usize,
}

impl AddAssign for IngestSummary {
    fn add_assign(&mut self, other: Self) {
        self.items += other.items;
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.duplicates += other.duplicates;
    }
}

/// One row of the inventory view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartRecord {
    pub part_key: String,
    pub vendor: String,
    pub sku: String,
    pub description: String,
    pub manufacturer: Option<String>,
    pub mfg_part: Option<String>,
    pub purchase_url: Option<String>,
    pub units_received: i64,
    pub total_spend: Decimal,
    pub avg_unit_cost: Decimal,
    pub last_invoice: Option<String>,
    pub on_hand: i64,
    pub updated_utc: String,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        debug!("opened inventory database {}", path.display());
        Self::init(conn)
    }

    /// Throwaway database, for tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Add every keyed item of `receipt` to `parts_received`.
    ///
    /// Units and spend accumulate per part key; the average unit cost is
    /// recomputed from the new totals. The whole receipt is one transaction.
    /// An order is applied once: its vendor and invoice (or file name when it
    /// has no invoice number) are recorded, and a repeat is reported as
    /// duplicates without touching the totals.
    pub fn upsert_receipt(&mut self, receipt: &ParsedReceipt) -> Result<IngestSummary> {
        let now = utc_now();
        let last_invoice = receipt.order.invoice.as_deref();
        let mut summary = IngestSummary::default();

        let tx = self.conn.transaction()?;
        if !record_order(&tx, &receipt.order, receipt.items.len(), &now)? {
            info!(
                "{}: order {} already ingested, skipping",
                receipt.order.source_file,
                order_ref(&receipt.order)
            );
            summary.items = receipt.items.len();
            summary.duplicates = receipt.items.len();
            return Ok(summary);
        }

        for item in &receipt.items {
            summary.items += 1;
            if item.sku.trim().is_empty() {
                warn!(
                    "{}: skipping item without SKU: {:?}",
                    receipt.order.source_file, item.description
                );
                summary.skipped += 1;
                continue;
            }

            if upsert_item(&tx, item, last_invoice, &now)? {
                summary.inserted += 1;
            } else {
                summary.updated += 1;
            }
        }
        tx.commit()?;

        info!(
            "{}: {} inserted, {} updated, {} skipped",
            receipt.order.source_file, summary.inserted, summary.updated, summary.skipped
        );
        Ok(summary)
    }

    /// Log `qty` units of `part_key` as used. Returns the removal id.
    pub fn log_removal(
        &self,
        part_key: &str,
        qty: u32,
        project: Option<&str>,
        note: Option<&str>,
    ) -> Result<String> {
        if qty == 0 {
            return Err(StoreError::InvalidQuantity.into());
        }

        let known = self
            .conn
            .query_row(
                "SELECT 1 FROM parts_received WHERE part_key = ?1 LIMIT 1",
                params![part_key],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !known {
            return Err(StoreError::UnknownPart(part_key.to_string()).into());
        }

        let removal_uid = Uuid::new_v4().to_string();
        let now = utc_now();
        self.conn.execute(
            "INSERT INTO parts_removed
               (removal_uid, part_key, qty_removed, ts_utc, project, note, updated_utc)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?4)",
            params![
                removal_uid,
                part_key,
                qty,
                now,
                project.unwrap_or(""),
                note.unwrap_or("")
            ],
        )?;

        info!("logged removal of {} x {}", qty, part_key);
        Ok(removal_uid)
    }

    /// Current state of one part, including units on hand.
    pub fn part(&self, part_key: &str) -> Result<Option<PartRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT part_key, vendor, sku, description, manufacturer, mfg_part, purchase_url,
                        units_received, total_spend, avg_unit_cost, last_invoice, on_hand,
                        updated_utc
                 FROM inventory_view WHERE part_key = ?1",
                params![part_key],
                part_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Number of distinct part keys received.
    pub fn part_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM parts_received", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS parts_received (
          part_key TEXT PRIMARY KEY,
          vendor TEXT NOT NULL,
          sku TEXT NOT NULL,
          description TEXT NOT NULL DEFAULT '',
          desc_clean TEXT NOT NULL DEFAULT '',
          manufacturer TEXT,
          mfg_part TEXT,
          purchase_url TEXT,
          label_line1 TEXT,
          label_line2 TEXT,
          label_short TEXT,
          label_qr_url TEXT,
          label_qr_text TEXT,
          units_received INTEGER NOT NULL DEFAULT 0,
          total_spend TEXT NOT NULL DEFAULT '0',
          avg_unit_cost TEXT NOT NULL DEFAULT '0',
          last_invoice TEXT,
          updated_utc TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS parts_removed (
          removal_uid TEXT PRIMARY KEY,
          part_key TEXT NOT NULL REFERENCES parts_received(part_key),
          qty_removed INTEGER NOT NULL CHECK (qty_removed > 0),
          ts_utc TEXT NOT NULL,
          project TEXT,
          note TEXT,
          updated_utc TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_parts_removed_part_key
          ON parts_removed(part_key);

        CREATE TABLE IF NOT EXISTS orders_ingested (
          vendor TEXT NOT NULL,
          order_ref TEXT NOT NULL,
          source_file TEXT NOT NULL,
          invoice_date TEXT,
          payment_date TEXT,
          item_count INTEGER NOT NULL,
          ingested_utc TEXT NOT NULL,
          PRIMARY KEY (vendor, order_ref)
        );

        CREATE VIEW IF NOT EXISTS inventory_view AS
          SELECT r.*,
                 r.units_received - COALESCE(
                   (SELECT SUM(m.qty_removed) FROM parts_removed m WHERE m.part_key = r.part_key),
                   0
                 ) AS on_hand
          FROM parts_received r;
        ",
    )?;
    Ok(())
}

/// Identity of an order within its vendor.
fn order_ref(order: &ParsedOrder) -> &str {
    order.invoice.as_deref().unwrap_or(&order.source_file)
}

/// Remember `order`. Returns `false` when it was already recorded.
fn record_order(
    conn: &Connection,
    order: &ParsedOrder,
    item_count: usize,
    now: &str,
) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO orders_ingested
           (vendor, order_ref, source_file, invoice_date, payment_date, item_count, ingested_utc)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            order.vendor.as_str(),
            order_ref(order),
            order.source_file,
            order.invoice_date_parsed().map(|d| d.to_string()),
            order.payment_date_parsed().map(|d| d.to_string()),
            i64::try_from(item_count).unwrap_or(i64::MAX),
            now
        ],
    )?;
    Ok(inserted > 0)
}

/// Insert or accumulate one item. Returns `true` when the part key is new.
fn upsert_item(
    conn: &Connection,
    item: &ParsedLineItem,
    last_invoice: Option<&str>,
    now: &str,
) -> Result<bool> {
    let part_key = item.part_key();
    let qty = i64::from(item.received_quantity().unwrap_or(0));
    let spend = item.spend().unwrap_or(Decimal::ZERO);

    let existing = conn
        .query_row(
            "SELECT units_received, total_spend, avg_unit_cost
             FROM parts_received WHERE part_key = ?1",
            params![part_key],
            |row| {
                Ok((
                    row.get::<_, SqlNumber>(0)?,
                    row.get::<_, SqlNumber>(1)?,
                    row.get::<_, SqlNumber>(2)?,
                ))
            },
        )
        .optional()?;

    match existing {
        Some((units, total, avg)) => {
            let units = units.units().saturating_add(qty);
            let total = total.0.checked_add(spend).unwrap_or_else(|| {
                warn!("{}: total spend overflows, keeping {}", part_key, total.0);
                total.0
            });
            let avg = average_cost(total, units).unwrap_or(avg.0);

            conn.execute(
                "UPDATE parts_received
                 SET units_received = ?2,
                     total_spend = ?3,
                     avg_unit_cost = ?4,
                     last_invoice = COALESCE(?5, last_invoice),
                     purchase_url = COALESCE(?6, purchase_url),
                     manufacturer = COALESCE(manufacturer, ?7),
                     mfg_part = COALESCE(mfg_part, ?8),
                     description = CASE WHEN COALESCE(description, '') = '' THEN ?9 ELSE description END,
                     desc_clean = CASE WHEN COALESCE(desc_clean, '') = '' THEN ?10 ELSE desc_clean END,
                     updated_utc = ?11
                 WHERE part_key = ?1",
                params![
                    part_key,
                    units,
                    total.to_string(),
                    avg.to_string(),
                    last_invoice,
                    item.url,
                    item.manufacturer,
                    item.mfg_part,
                    item.description,
                    squash_whitespace(&item.description),
                    now
                ],
            )?;
            debug!("{}: now {} units received", part_key, units);
            Ok(false)
        }
        None => {
            let avg = average_cost(spend, qty).unwrap_or(Decimal::ZERO);

            conn.execute(
                "INSERT INTO parts_received (
                   part_key, vendor, sku, description, desc_clean, label_short,
                   manufacturer, mfg_part, purchase_url,
                   units_received, total_spend, avg_unit_cost, last_invoice, updated_utc
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    part_key,
                    item.vendor.as_str(),
                    item.sku,
                    item.description,
                    squash_whitespace(&item.description),
                    item.manufacturer,
                    item.mfg_part,
                    item.url,
                    qty,
                    spend.to_string(),
                    avg.to_string(),
                    last_invoice,
                    now
                ],
            )?;
            debug!("{}: new part, {} units", part_key, qty);
            Ok(true)
        }
    }
}

/// Spend per unit, when both are positive.
fn average_cost(total: Decimal, units: i64) -> Option<Decimal> {
    if units > 0 && total > Decimal::ZERO {
        total
            .checked_div(Decimal::from(units))
            .map(|avg| avg.round_dp(AVG_COST_SCALE))
    } else {
        None
    }
}

/// Numeric column stored as INTEGER, REAL or decimal text. NULL reads as zero.
struct SqlNumber(Decimal);

impl SqlNumber {
    /// Whole units, rounded.
    fn units(&self) -> i64 {
        self.0.round().to_i64().unwrap_or_default()
    }
}

impl FromSql for SqlNumber {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(SqlNumber(Decimal::ZERO)),
            ValueRef::Integer(i) => Ok(SqlNumber(Decimal::from(i))),
            ValueRef::Real(f) => Decimal::from_f64(f)
                .map(SqlNumber)
                .ok_or(FromSqlError::InvalidType),
            ValueRef::Text(_) => value
                .as_str()
                .map(|s| SqlNumber(to_decimal(s).unwrap_or_default())),
            ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

fn part_from_row(row: &Row<'_>) -> rusqlite::Result<PartRecord> {
    Ok(PartRecord {
        part_key: row.get(0)?,
        vendor: row.get(1)?,
        sku: row.get(2)?,
        description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        manufacturer: row.get(4)?,
        mfg_part: row.get(5)?,
        purchase_url: row.get(6)?,
        units_received: row.get::<_, SqlNumber>(7)?.units(),
        total_spend: row.get::<_, SqlNumber>(8)?.0,
        avg_unit_cost: row.get::<_, SqlNumber>(9)?.0,
        last_invoice: row.get(10)?,
        on_hand: row.get::<_, SqlNumber>(11)?.units(),
        updated_utc: row.get(12)?,
    })
}

fn utc_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}
