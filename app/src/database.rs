use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{params, Connection, Transaction};
use std::path::Path;

use crate::models::Registro;
use crate::query::TabelaMestra;
use crate::ui;

const CHUNK_SIZE: usize = 50_000;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Falha ao criar/abrir banco: {}", path))?;

        Ok(Self { conn })
    }

    pub fn create_tables(&self) -> Result<()> {
        self.conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS negocios (
                id_cliente TEXT,
                nom_estab TEXT,
                raz_social TEXT,
                municipio TEXT,
                localidad TEXT,
                nombre_act TEXT,
                tipo_asent TEXT,
                telefono TEXT,
                correoelec TEXT,
                www TEXT,
                cod_postal TEXT,
                latitud REAL NOT NULL,
                longitud REAL NOT NULL,
                year_registro INTEGER
            )
            "#,
            [],
        )?;

        self.conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS _referencia (
                referencia TEXT,
                valor TEXT
            )
            "#,
            [],
        )?;

        Ok(())
    }

    pub fn create_index(&self, table: &str, column: &str) -> Result<()> {
        let index_name = format!("idx_{}_{}", table, column);
        let sql = format!("CREATE INDEX IF NOT EXISTS {} ON {}({})", index_name, table, column);
        self.conn.execute(&sql, [])?;
        Ok(())
    }

    pub fn begin_transaction(&mut self) -> Result<Transaction> {
        Ok(self.conn.transaction()?)
    }

    /// Insere os registros em transações de `CHUNK_SIZE` linhas.
    pub fn insert_registros(&mut self, registros: &[Registro]) -> Result<u64> {
        let pb = ui::progress_bar(registros.len() as u64);
        let mut count = 0u64;

        for chunk in registros.chunks(CHUNK_SIZE) {
            let tx = self.begin_transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO negocios VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                )?;
                for r in chunk {
                    let d = &r.dados;
                    stmt.execute(params![
                        d.id_cliente,
                        d.nom_estab,
                        d.raz_social,
                        d.municipio,
                        d.localidad,
                        d.nombre_act,
                        d.tipo_asent,
                        d.telefono,
                        d.correoelec,
                        d.www,
                        d.cod_postal,
                        r.latitud,
                        r.longitud,
                        r.year_registro,
                    ])?;
                    count += 1;
                }
            }
            tx.commit()?;
            pb.set_position(count);
        }

        pb.finish_with_message(format!("{} registros", count));
        Ok(count)
    }

    pub fn finalize_processing(&self, tabela: &TabelaMestra) -> Result<()> {
        self.create_index("negocios", "latitud")?;
        self.create_index("negocios", "longitud")?;
        self.create_index("negocios", "year_registro")?;

        let years = tabela
            .distinct_years()
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let referencias = [
            ("registros", tabela.len().to_string()),
            ("descartados", tabela.descartados().to_string()),
            ("years", years),
            ("gerado_em", Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        ];
        for (referencia, valor) in referencias {
            self.conn.execute(
                "INSERT INTO _referencia (referencia, valor) VALUES (?1, ?2)",
                params![referencia, valor],
            )?;
        }

        Ok(())
    }

    pub fn get_connection(&self) -> &Connection {
        &self.conn
    }
}

/// Grava a tabela mestra em um arquivo SQLite novo.
pub fn exportar(tabela: &TabelaMestra, db_path: &str) -> Result<u64> {
    ui::print_header("💾 Exportação da tabela mestra → SQLite");

    if Path::new(db_path).exists() {
        ui::print_error(&format!("O arquivo {:?} já existe!", db_path));
        ui::print_info("Apague o arquivo existente e execute novamente, ou use outro destino.");
        anyhow::bail!("Banco de dados já existe: {:?}", db_path);
    }
    if let Some(parent) = Path::new(db_path).parent().filter(|p| !p.as_os_str().is_empty()) {
        crate::utils::ensure_dir(&parent.to_string_lossy())?;
    }

    ui::print_step(1, 3, "Criando estrutura do banco de dados");
    let mut db = Database::new(db_path)?;
    db.create_tables()?;

    ui::print_step(2, 3, "Inserindo registros");
    let count = db.insert_registros(tabela.registros())?;

    ui::print_step(3, 3, "Criando índices");
    db.finalize_processing(tabela)?;

    let total: i64 = db
        .get_connection()
        .query_row("SELECT COUNT(*) FROM negocios", [], |row| row.get(0))?;
    ui::print_success(&format!("Arquivo criado: {} ({} registros)", db_path, total));

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn exports_master_table_with_reference_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("saida").join("denue.db");
        let db_path = db_path.to_str().unwrap();

        let count = exportar(&test_support::tabela_exemplo(), db_path).unwrap();
        assert_eq!(count, 3);

        let conn = Connection::open(db_path).unwrap();
        let municipio: Option<String> = conn
            .query_row(
                "SELECT municipio FROM negocios WHERE nom_estab = 'Guadalajara'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(municipio, None);

        let em_2019: i64 = conn
            .query_row("SELECT COUNT(*) FROM negocios WHERE year_registro = 2019", [], |row| row.get(0))
            .unwrap();
        assert_eq!(em_2019, 1);

        let years: String = conn
            .query_row("SELECT valor FROM _referencia WHERE referencia = 'years'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(years, "2014,2019");

        let indices: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND tbl_name = 'negocios'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(indices, 3);
    }

    #[test]
    fn refuses_to_overwrite_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("denue.db");
        std::fs::write(&db_path, b"").unwrap();

        let result = exportar(&test_support::tabela_exemplo(), db_path.to_str().unwrap());
        assert!(result.is_err());
    }
}
