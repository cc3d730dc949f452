use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use encoding_rs::Encoding;
use encoding_rs_io::DecodeReaderBytesBuilder;
use std::fs;
use std::path::{Path, PathBuf};

pub fn ensure_dir(path: &str) -> Result<()> {
    if !Path::new(path).exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Falha ao criar diretório: {}", path))?;
    }
    Ok(())
}

pub fn is_dir_empty(path: &str) -> Result<bool> {
    let mut dir = fs::read_dir(path)
        .with_context(|| format!("Falha ao ler diretório: {}", path))?;
    Ok(dir.next().is_none())
}

pub fn get_files_by_extension(dir: &str, ext: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*{}", dir, ext);
    Ok(find_files(&pattern)?)
}

/// Arquivos que casam com o padrão glob, em ordem alfabética.
pub fn find_files(pattern: &str) -> Result<Vec<PathBuf>, glob::PatternError> {
    let mut files: Vec<PathBuf> = glob::glob(pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Abre o arquivo decodificando para UTF-8 a partir de `encoding`.
/// Um BOM no início do arquivo tem precedência sobre a codificação informada.
pub fn create_reader(file_path: &Path, encoding: &'static Encoding) -> std::io::Result<Box<dyn std::io::Read>> {
    let file = fs::File::open(file_path)?;

    let reader = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .bom_override(true)
        .build(file);

    Ok(Box::new(reader))
}

/// Célula vazia ou só com espaços vira `None`.
pub fn texto(valor: &str) -> Option<String> {
    let valor = valor.trim();
    if valor.is_empty() {
        None
    } else {
        Some(valor.to_string())
    }
}

/// Ano de registro a partir de `fecha_alta`.
///
/// O DENUE publica a data como `AAAA-MM`; os demais formatos aparecem em
/// extrações antigas e em arquivos reexportados por planilhas.
pub fn parse_year(fecha: &str) -> Option<i32> {
    const FORMATOS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

    let fecha = fecha.trim();
    if fecha.is_empty() {
        return None;
    }

    for formato in FORMATOS {
        if let Ok(data) = NaiveDate::parse_from_str(fecha, formato) {
            return Some(data.year());
        }
    }

    if let Ok(data) = NaiveDateTime::parse_from_str(fecha, "%Y-%m-%d %H:%M:%S") {
        return Some(data.year());
    }

    let completa = match fecha.len() {
        4 => format!("{}-01-01", fecha),
        7 => format!("{}-01", fecha),
        _ => return None,
    };
    NaiveDate::parse_from_str(&completa, "%Y-%m-%d")
        .ok()
        .map(|data| data.year())
}

pub fn format_progress(current: usize, total: usize) -> String {
    let percent = if total == 0 {
        100.0
    } else {
        (current as f64 / total as f64) * 100.0
    };
    format!("{:.1}% ({}/{})", percent, current, total)
}
