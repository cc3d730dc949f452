use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use zip::ZipArchive;

use crate::ui;
use crate::utils;

/// Descompacta os ZIPs baixados do INEGI no diretório de dados.
pub fn unpack_archives(input_dir: &str, output_dir: &str, auto_yes: bool) -> Result<usize> {
    ui::print_header("📦 Descompactação dos arquivos do DENUE");
    ui::print_info(&format!("Diretório de entrada: {}", input_dir));
    ui::print_info(&format!("Diretório de saída: {}", output_dir));

    let zip_files = utils::get_files_by_extension(input_dir, ".zip")?;
    if zip_files.is_empty() {
        anyhow::bail!("Nenhum arquivo ZIP encontrado em {}", input_dir);
    }
    ui::print_success(&format!("{} arquivo(s) ZIP encontrado(s)", zip_files.len()));

    utils::ensure_dir(output_dir)?;
    if !utils::is_dir_empty(output_dir)? {
        ui::print_warning(&format!("A pasta {} não está vazia; arquivos com o mesmo nome serão sobrescritos.", output_dir));

        let should_continue = if auto_yes {
            true
        } else {
            ui::ask_confirmation("Deseja prosseguir assim mesmo?", false)?
        };

        if !should_continue {
            ui::print_info("Operação cancelada pelo usuário.");
            return Ok(0);
        }
    }

    let pb = ui::progress_bar(zip_files.len() as u64);
    let mut extraidos = 0;
    for (idx, zip_file) in zip_files.iter().enumerate() {
        let filename = zip_file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("arquivo");
        pb.set_message(format!("{} ({}/{})", filename, idx + 1, zip_files.len()));
        extraidos += extract_zip(zip_file, output_dir)
            .with_context(|| format!("Falha ao descompactar {:?}", zip_file))?;
        pb.inc(1);
    }
    pb.finish_with_message("Descompactação concluída!");

    ui::print_statistics(&[
        ("Arquivos ZIP", zip_files.len() as u64),
        ("Arquivos extraídos", extraidos as u64),
    ]);

    Ok(extraidos)
}

/// Extrai um ZIP e devolve quantos arquivos foram gravados.
/// Entradas com caminhos que escapam do diretório de saída são ignoradas.
fn extract_zip(zip_path: &Path, output_dir: &str) -> Result<usize> {
    let file = fs::File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;
    let mut count = 0;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let Some(relative) = file.enclosed_name().map(|p| p.to_path_buf()) else {
            ui::print_warning(&format!("Entrada ignorada (caminho inválido): {}", file.name()));
            continue;
        };
        let outpath = Path::new(output_dir).join(relative);

        if file.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(p) = outpath.parent() {
                fs::create_dir_all(p)?;
            }
            let mut outfile = fs::File::create(&outpath)?;
            std::io::copy(&mut file, &mut outfile)?;
            ui::print_verbose(&format!("Extraído: {:?}", outpath));
            count += 1;
        }
    }

    Ok(count)
}
