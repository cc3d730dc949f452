use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use crate::config::DatasetLayout;
use crate::coords;
use crate::error::LoadError;
use crate::join::{self, Catalogos, Dicionario, KeyedTable};
use crate::models::{Contato, Endereco, Estabelecimento};
use crate::query::TabelaMestra;
use crate::schema::{self, JoinKey};
use crate::ui;
use crate::utils;

/// Carrega todos os arquivos, aplica os joins e limpa as coordenadas.
pub fn carregar_dataset(layout: &DatasetLayout) -> Result<TabelaMestra, LoadError> {
    let inicio = Instant::now();
    ui::print_info(&format!("Diretório de dados: {:?}", layout.dir));

    let pb = ui::progress_bar(7);

    pb.set_message("municipios");
    let municipios = carregar_dicionario(layout, &layout.municipios, &schema::MUNICIPIO, schema::NOM_MUN)?;
    pb.inc(1);

    pb.set_message("localidades");
    let localidades = carregar_dicionario(layout, &layout.localidades, &schema::LOCALIDAD, schema::NOM_LOC)?;
    pb.inc(1);

    pb.set_message("domicilios");
    let domicilios = carregar_domicilios(layout)?;
    pb.inc(1);

    pb.set_message("tipos_asentamiento");
    let tipos_asentamiento = carregar_dicionario(
        layout,
        &layout.tipos_asentamiento,
        &schema::TIPO_ASENTAMIENTO,
        schema::TIPO_ASENT,
    )?;
    pb.inc(1);

    pb.set_message("actividades");
    let actividades = carregar_dicionario(layout, &layout.actividades, &schema::ACTIVIDAD, schema::NOMBRE_ACT)?;
    pb.inc(1);

    pb.set_message("contactos");
    let contactos = carregar_contactos(layout)?;
    pb.inc(1);

    pb.set_message("establecimientos");
    let estabelecimentos = carregar_estabelecimentos(layout)?;
    pb.inc(1);
    pb.finish_with_message("Tabelas carregadas!");

    let catalogos = Catalogos {
        municipios,
        localidades,
        domicilios,
        tipos_asentamiento,
        actividades,
        contactos,
    };
    for (tabela, linhas) in catalogos.estatisticas() {
        if linhas == 0 {
            log::warn!("catálogo {} vazio: todas as descrições ficarão nulas", tabela);
        }
        ui::print_verbose(&format!("{}: {} linhas", tabela, linhas));
    }

    let total = estabelecimentos.len();
    let unidas = join::left_join_all(estabelecimentos, &catalogos);
    let (registros, descartados) = coords::sanitize(unidas);

    log::info!(
        "tabela mestra pronta: {} registros, {} descartados sem coordenadas, de {} estabelecimentos em {:.1}s",
        registros.len(),
        descartados,
        total,
        inicio.elapsed().as_secs_f64()
    );

    Ok(TabelaMestra::new(registros, descartados))
}

/// Entrada usada na inicialização: qualquer falha vira uma tabela vazia.
pub fn carregar_ou_vazio(layout: &DatasetLayout) -> TabelaMestra {
    match carregar_dataset(layout) {
        Ok(tabela) => tabela,
        Err(e) => {
            log::error!("falha ao carregar os dados do DENUE: {}", e);
            ui::print_error(&format!("Ocorreu um erro ao processar os arquivos: {}", e));
            ui::print_warning("O servidor seguirá sem dados.");
            TabelaMestra::vazia()
        }
    }
}

fn carregar_dicionario(
    layout: &DatasetLayout,
    arquivo: &str,
    chave: &JoinKey,
    descricao: &str,
) -> Result<Dicionario, LoadError> {
    let linhas = ler_tabela(layout, &layout.path(arquivo), &[chave.direita, descricao], |v| {
        (v[0].to_string(), utils::texto(v[1]))
    })?;
    KeyedTable::from_rows(chave.tabela, linhas)
}

fn carregar_domicilios(layout: &DatasetLayout) -> Result<KeyedTable<Endereco>, LoadError> {
    let colunas = [
        schema::DOMICILIO.direita,
        schema::COD_POSTAL,
        schema::TIPO_ASENTAMIENTO.esquerda,
    ];
    let linhas = ler_tabela(layout, &layout.path(&layout.domicilios), &colunas, |v| {
        (
            v[0].to_string(),
            Endereco {
                cod_postal: utils::texto(v[1]),
                cve_tipo_asent: utils::texto(v[2]),
            },
        )
    })?;
    KeyedTable::from_rows(schema::DOMICILIO.tabela, linhas)
}

fn carregar_contactos(layout: &DatasetLayout) -> Result<KeyedTable<Contato>, LoadError> {
    let colunas = [
        schema::CONTACTO.direita,
        schema::TELEFONO,
        schema::CORREOELEC,
        schema::WWW,
    ];
    let linhas = ler_tabela(layout, &layout.path(&layout.contactos), &colunas, |v| {
        (
            v[0].to_string(),
            Contato {
                telefono: utils::texto(v[1]),
                correoelec: utils::texto(v[2]),
                www: utils::texto(v[3]),
            },
        )
    })?;
    KeyedTable::from_rows(schema::CONTACTO.tabela, linhas)
}

/// Lê todos os arquivos de estabelecimentos e garante `id_cliente` único.
fn carregar_estabelecimentos(layout: &DatasetLayout) -> Result<Vec<Estabelecimento>, LoadError> {
    let pattern = layout.establecimientos_pattern();
    let files = utils::find_files(&pattern)?;
    if files.is_empty() {
        return Err(LoadError::NoFactFiles(pattern));
    }

    let mut estabelecimentos = Vec::new();
    for (idx, file) in files.iter().enumerate() {
        ui::print_verbose(&format!(
            "{:?} {}",
            file,
            utils::format_progress(idx + 1, files.len())
        ));
        let linhas = ler_tabela(layout, file, &schema::COLUNAS_ESTABELECIMENTO, |v| Estabelecimento {
            id_cliente: utils::texto(v[0]),
            nom_estab: utils::texto(v[1]),
            raz_social: utils::texto(v[2]),
            codigo_act: utils::texto(v[3]),
            cve_mun: utils::texto(v[4]),
            cve_loc: utils::texto(v[5]),
            fecha_alta: utils::texto(v[6]),
            latitud: coords::coerce(v[7]),
            longitud: coords::coerce(v[8]),
        })?;
        estabelecimentos.extend(linhas);
    }

    let mut vistos = HashSet::with_capacity(estabelecimentos.len());
    for estab in &estabelecimentos {
        if let Some(chave) = estab.id_cliente.as_deref().and_then(join::normalize_key) {
            if !vistos.insert(chave.clone()) {
                return Err(LoadError::DuplicateKey {
                    tabela: "establecimientos",
                    chave,
                });
            }
        }
    }

    Ok(estabelecimentos)
}

/// Lê um CSV com cabeçalho e entrega a `linha` os valores de `colunas`,
/// na mesma ordem. Falta de arquivo ou de coluna é erro.
fn ler_tabela<T>(
    layout: &DatasetLayout,
    arquivo: &Path,
    colunas: &[&str],
    mut linha: impl FnMut(&[&str]) -> T,
) -> Result<Vec<T>, LoadError> {
    if !arquivo.exists() {
        return Err(LoadError::MissingFile(arquivo.to_path_buf()));
    }

    let reader = utils::create_reader(arquivo, layout.encoding).map_err(|source| LoadError::Io {
        arquivo: arquivo.to_path_buf(),
        source,
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(layout.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let csv_error = |source: csv::Error| LoadError::Csv {
        arquivo: arquivo.to_path_buf(),
        source,
    };

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
        .collect();

    let indices = colunas
        .iter()
        .map(|coluna| {
            headers
                .iter()
                .position(|h| h == coluna)
                .ok_or_else(|| LoadError::MissingColumn {
                    arquivo: arquivo.to_path_buf(),
                    coluna: coluna.to_string(),
                })
        })
        .collect::<Result<Vec<usize>, LoadError>>()?;

    let mut linhas = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_error)?;
        let valores: Vec<&str> = indices.iter().map(|&i| record.get(i).unwrap_or("")).collect();
        linhas.push(linha(&valores));
    }

    ui::print_verbose(&format!("{:?}: {} linhas", arquivo, linhas.len()));
    Ok(linhas)
}
