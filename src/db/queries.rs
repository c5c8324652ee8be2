use crate::db::Database;
use crate::error::Result;
use crate::models::Plant;
use rusqlite::{params, Connection, Row};

const PLANT_COLUMNS: &str =
    "id, name, seasonSowing, seasonBloom, zone, water, description, image, category";

// Plant Queries

impl Database {
    #[cfg(test)]
    pub fn insert_plant(&self, plant: &Plant) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO Plant
                    (name, seasonSowing, seasonBloom, zone, water, description, image, category)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    plant.name,
                    plant.season_sowing,
                    plant.season_bloom,
                    plant.zone,
                    plant.water,
                    plant.description,
                    plant.image,
                    plant.category,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Insert many plants in a single transaction.
    pub fn insert_plants(&self, plants: &[Plant]) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let inserted = insert_all(&tx, plants)?;
            tx.commit()?;
            Ok(inserted)
        })
    }

    /// Swap the whole table for `plants`. Nothing is removed unless every
    /// insert succeeds. Returns `(removed, inserted)`.
    pub fn replace_plants(&self, plants: &[Plant]) -> Result<(usize, usize)> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let removed = tx.execute("DELETE FROM Plant", [])?;
            let inserted = insert_all(&tx, plants)?;
            tx.commit()?;
            Ok((removed, inserted))
        })
    }

    pub fn get_plant(&self, id: i64) -> Result<Option<Plant>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM Plant WHERE id = ?1", PLANT_COLUMNS),
                [id],
                row_to_plant,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn get_all_plants(&self) -> Result<Vec<Plant>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {} FROM Plant ORDER BY id", PLANT_COLUMNS))?;
            let plants = stmt
                .query_map([], row_to_plant)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(plants)
        })
    }

    pub fn count_plants(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM Plant", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }

    /// The plant at `offset` in id order, used for uniform random picks.
    pub fn get_plant_at_offset(&self, offset: usize) -> Result<Option<Plant>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "SELECT {} FROM Plant ORDER BY id LIMIT 1 OFFSET ?1",
                    PLANT_COLUMNS
                ),
                [offset as i64],
                row_to_plant,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn get_distinct_categories(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT DISTINCT category FROM Plant
                WHERE category IS NOT NULL AND category <> ''
                ORDER BY category
                "#,
            )?;
            let categories = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(categories)
        })
    }

}

fn insert_all(conn: &Connection, plants: &[Plant]) -> Result<usize> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO Plant
            (name, seasonSowing, seasonBloom, zone, water, description, image, category)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )?;
    for plant in plants {
        stmt.execute(params![
            plant.name,
            plant.season_sowing,
            plant.season_bloom,
            plant.zone,
            plant.water,
            plant.description,
            plant.image,
            plant.category,
        ])?;
    }
    Ok(plants.len())
}

fn row_to_plant(row: &Row) -> rusqlite::Result<Plant> {
    Ok(Plant {
        id: Some(row.get("id")?),
        name: row.get::<_, Option<String>>("name")?.unwrap_or_default(),
        season_sowing: row.get("seasonSowing")?,
        season_bloom: row.get("seasonBloom")?,
        zone: row.get("zone")?,
        water: row.get("water")?,
        description: row.get("description")?,
        image: row.get("image")?,
        category: row.get("category")?,
    })
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.insert_plants(&[
            Plant::new("玫瑰").with_bloom("春、夏").with_category("灌木"),
            Plant::new("菊花").with_bloom("秋").with_category("草本"),
            Plant::new("梅花").with_bloom("冬").with_category("灌木"),
            Plant::new("无分类"),
        ])
        .unwrap();
        db
    }

    #[test]
    fn insert_and_get_plant() {
        let db = Database::open_in_memory().unwrap();
        let plant = Plant::new("向日葵").with_bloom("夏").with_sowing("春");
        let id = db.insert_plant(&plant).unwrap();

        let loaded = db.get_plant(id).unwrap().unwrap();
        assert_eq!(loaded.id, Some(id));
        assert_eq!(loaded.name, "向日葵");
        assert_eq!(loaded.season_bloom.as_deref(), Some("夏"));
        assert_eq!(loaded.season_sowing.as_deref(), Some("春"));
        assert!(loaded.zone.is_none());

        assert!(db.get_plant(id + 100).unwrap().is_none());
    }

    #[test]
    fn count_and_offset() {
        let db = seeded();
        assert_eq!(db.count_plants().unwrap(), 4);
        assert_eq!(db.get_plant_at_offset(0).unwrap().unwrap().name, "玫瑰");
        assert_eq!(db.get_plant_at_offset(3).unwrap().unwrap().name, "无分类");
        assert!(db.get_plant_at_offset(4).unwrap().is_none());
    }

    #[test]
    fn distinct_categories_skip_empty() {
        let db = seeded();
        db.insert_plant(&Plant::new("空分类").with_category("")).unwrap();
        let categories = db.get_distinct_categories().unwrap();
        assert_eq!(categories.len(), 2);
        assert!(categories.contains(&"灌木".to_string()));
        assert!(categories.contains(&"草本".to_string()));
        let mut sorted = categories.clone();
        sorted.sort();
        assert_eq!(categories, sorted);
    }

    #[test]
    fn null_name_reads_as_empty() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TABLE legacy AS SELECT * FROM Plant;
                 DROP TABLE Plant;
                 CREATE TABLE Plant (id INTEGER PRIMARY KEY, name TEXT, seasonSowing TEXT,
                     seasonBloom TEXT, zone TEXT, water TEXT, description TEXT, image TEXT,
                     category TEXT);
                 INSERT INTO Plant (id) VALUES (7);",
            )?;
            Ok(())
        })
        .unwrap();

        let plant = db.get_plant(7).unwrap().unwrap();
        assert_eq!(plant.name, "");
    }

    #[test]
    fn replace_swaps_table_contents() {
        let db = seeded();
        let (removed, inserted) = db
            .replace_plants(&[Plant::new("荷花").with_bloom("夏")])
            .unwrap();
        assert_eq!((removed, inserted), (4, 1));

        let plants = db.get_all_plants().unwrap();
        assert_eq!(plants.len(), 1);
        assert_eq!(plants[0].name, "荷花");
    }

    #[test]
    fn failed_replace_keeps_existing_plants() {
        let db = seeded();
        db.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER reject_lotus BEFORE INSERT ON Plant
                 WHEN NEW.name = '荷花'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )?;
            Ok(())
        })
        .unwrap();

        let result = db.replace_plants(&[Plant::new("睡莲"), Plant::new("荷花")]);
        assert!(result.is_err());

        let names: Vec<String> = db.get_all_plants().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["玫瑰", "菊花", "梅花", "无分类"]);
    }
}
