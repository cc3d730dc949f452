use anyhow::{bail, Result};
use encoding_rs::Encoding;
use std::path::{Path, PathBuf};

/// Disposição fixa dos arquivos do DENUE dentro do diretório de dados.
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    pub dir: PathBuf,
    /// Padrão glob; o DENUE é publicado em um arquivo por estado
    pub establecimientos: String,
    pub municipios: String,
    pub localidades: String,
    pub actividades: String,
    pub tipos_asentamiento: String,
    pub domicilios: String,
    pub contactos: String,
    pub encoding: &'static Encoding,
    pub delimiter: u8,
}

impl DatasetLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            establecimientos: "establecimientos*.csv".to_string(),
            municipios: "municipios.csv".to_string(),
            localidades: "localidades.csv".to_string(),
            actividades: "actividades.csv".to_string(),
            tipos_asentamiento: "tipos_asentamiento.csv".to_string(),
            domicilios: "domicilios.csv".to_string(),
            contactos: "contactos.csv".to_string(),
            encoding: encoding_rs::WINDOWS_1252, // Latin1 equivalente
            delimiter: b',',
        }
    }

    /// Monta o layout a partir das opções da linha de comando.
    pub fn from_args(dir: &Path, encoding: &str, delimiter: char) -> Result<Self> {
        let Some(encoding) = Encoding::for_label(encoding.trim().as_bytes()) else {
            bail!("Codificação desconhecida: {}", encoding);
        };
        if !delimiter.is_ascii() {
            bail!("O delimitador deve ser um caractere ASCII: {:?}", delimiter);
        }

        Ok(Self {
            encoding,
            delimiter: delimiter as u8,
            ..Self::new(dir)
        })
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    pub fn establecimientos_pattern(&self) -> String {
        self.path(&self.establecimientos).to_string_lossy().into_owned()
    }
}
