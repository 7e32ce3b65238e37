use crate::model::{BenchmarkEntry, HardwareClass, LaptopScore, MatchTier, SpecRecord, StorageError, StoredSpec};
use crate::utils::parse_datetime;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, Row};
use std::collections::HashSet;

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database and creates the schema.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS laptops (
                link TEXT PRIMARY KEY,
                position INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS specs (
                laptop_id TEXT PRIMARY KEY,
                fields TEXT NOT NULL,
                price INTEGER,
                fetched_at TEXT
            );

            CREATE TABLE IF NOT EXISTS benchmarks (
                class TEXT NOT NULL,
                name TEXT NOT NULL,
                score INTEGER NOT NULL,
                PRIMARY KEY (class, name)
            );

            CREATE TABLE IF NOT EXISTS scores (
                name TEXT PRIMARY KEY,
                price INTEGER NOT NULL,
                cpu_score INTEGER NOT NULL,
                gpu_score INTEGER NOT NULL,
                original_cpu_name TEXT NOT NULL,
                matched_cpu_name TEXT,
                match_type_cpu INTEGER,
                original_gpu_name TEXT NOT NULL,
                matched_gpu_name TEXT,
                match_type_gpu INTEGER,
                rating REAL
            );
            "
        )?;

        Ok(Self { conn })
    }

    /// Replaces the stored listing with `links`, keeping their order.
    pub fn save_links(&self, links: &[String]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM laptops", [])?;
        for (position, link) in links.iter().enumerate() {
            tx.execute(
                "INSERT OR IGNORE INTO laptops (link, position) VALUES (?1, ?2)",
                params![link, position as i64],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_links(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT link FROM laptops ORDER BY position ASC")?;
        let links: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<_, _>>()?;
        Ok(links)
    }

    pub fn save_spec(&self, laptop_id: &str, spec: &SpecRecord, fetched_at: DateTime<Utc>) -> Result<(), StorageError> {
        let fields = serde_json::to_string(&spec.fields)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO specs (laptop_id, fields, price, fetched_at) VALUES (?1, ?2, ?3, ?4)",
            params![laptop_id, fields, spec.price, fetched_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Laptops whose stored spec does not need to be fetched again.
    /// With no `max_age` every stored spec counts.
    pub fn fresh_spec_ids(&self, now: DateTime<Utc>, max_age: Option<Duration>) -> Result<HashSet<String>, StorageError> {
        let ids = self
            .get_all_specs()?
            .into_iter()
            .filter(|spec| max_age.is_none_or(|age| spec.is_fresh(now, age)))
            .map(|spec| spec.laptop_id)
            .collect();
        Ok(ids)
    }

    /// All stored specs, undecoded; a bad payload only fails its own record.
    pub fn get_all_specs(&self) -> Result<Vec<StoredSpec>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT laptop_id, fields, price, fetched_at FROM specs ORDER BY laptop_id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let fetched_at: Option<String> = row.get(3)?;
            Ok(StoredSpec {
                laptop_id: row.get(0)?,
                fields: row.get(1)?,
                price: row.get(2)?,
                fetched_at: fetched_at.as_deref().and_then(parse_datetime),
            })
        })?;

        let mut specs = Vec::new();
        for spec in rows {
            specs.push(spec?);
        }
        Ok(specs)
    }

    /// Replaces the benchmark table of `class`. Repeated names keep the last score.
    pub fn save_benchmarks(&self, class: HardwareClass, entries: &[BenchmarkEntry]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM benchmarks WHERE class = ?1", params![class.as_str()])?;
        for entry in entries {
            tx.execute(
                "INSERT OR REPLACE INTO benchmarks (class, name, score) VALUES (?1, ?2, ?3)",
                params![class.as_str(), &entry.name, entry.score],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_benchmarks(&self, class: HardwareClass) -> Result<Vec<BenchmarkEntry>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT name, score FROM benchmarks WHERE class = ?1 ORDER BY name ASC",
        )?;
        let entries: Vec<BenchmarkEntry> = stmt
            .query_map(params![class.as_str()], |row| {
                Ok(BenchmarkEntry {
                    name: row.get(0)?,
                    score: row.get(1)?,
                })
            })?
            .collect::<Result<_, _>>()?;
        Ok(entries)
    }

    /// Replaces the stored scores with the result of the latest rating run.
    pub fn save_scores(&self, scores: &[LaptopScore]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM scores", [])?;
        for score in scores {
            tx.execute(
                "INSERT OR REPLACE INTO scores (
                    name, price, cpu_score, gpu_score,
                    original_cpu_name, matched_cpu_name, match_type_cpu,
                    original_gpu_name, matched_gpu_name, match_type_gpu, rating
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    &score.name,
                    score.price,
                    score.cpu_score,
                    score.gpu_score,
                    &score.original_cpu_name,
                    &score.matched_cpu_name,
                    score.match_type_cpu.map(MatchTier::as_u8),
                    &score.original_gpu_name,
                    &score.matched_gpu_name,
                    score.match_type_gpu.map(MatchTier::as_u8),
                    score.rating,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_scores(&self) -> Result<Vec<LaptopScore>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT name, price, cpu_score, gpu_score,
                    original_cpu_name, matched_cpu_name, match_type_cpu,
                    original_gpu_name, matched_gpu_name, match_type_gpu, rating
             FROM scores",
        )?;

        let rows = stmt.query_map([], Self::map_score)?;
        let mut scores = Vec::new();
        for score in rows {
            scores.push(score?);
        }
        Ok(scores)
    }

    fn map_score(row: &Row) -> Result<LaptopScore, rusqlite::Error> {
        let match_type_cpu: Option<u8> = row.get(6)?;
        let match_type_gpu: Option<u8> = row.get(9)?;

        Ok(LaptopScore {
            name: row.get(0)?,
            price: row.get(1)?,
            cpu_score: row.get(2)?,
            gpu_score: row.get(3)?,
            original_cpu_name: row.get(4)?,
            matched_cpu_name: row.get(5)?,
            match_type_cpu: match_type_cpu.and_then(MatchTier::from_u8),
            original_gpu_name: row.get(7)?,
            matched_gpu_name: row.get(8)?,
            match_type_gpu: match_type_gpu.and_then(MatchTier::from_u8),
            rating: row.get(10)?,
        })
    }
}
