mod api;
mod archive;
mod config;
mod coords;
mod database;
mod error;
mod join;
mod loader;
mod models;
mod query;
mod schema;
mod ui;
mod utils;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DatasetLayout;
use crate::query::{Bbox, Consulta};

#[derive(Parser)]
#[command(name = "denue-mapa")]
#[command(about = "Mapa de negócios a partir dos dados abertos do DENUE", long_about = None)]
struct Cli {
    /// Pula todas as confirmações interativas (yes para tudo)
    #[arg(long, global = true)]
    yes: bool,

    /// Modo silencioso (menos saída)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Modo verboso (mais detalhes)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct DatasetArgs {
    /// Pasta com os CSVs do DENUE e seus catálogos
    #[arg(short, long, env = "DENUE_DATA_DIR", default_value = "datos")]
    data_dir: PathBuf,
    /// Codificação dos arquivos (rótulo WHATWG)
    #[arg(long, default_value = "latin1")]
    encoding: String,
    /// Separador de colunas
    #[arg(long, default_value = ",")]
    delimiter: char,
}

impl DatasetArgs {
    fn layout(&self) -> Result<DatasetLayout> {
        DatasetLayout::from_args(&self.data_dir, &self.encoding, self.delimiter)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Inicia o servidor web com o mapa e a API
    Server {
        #[command(flatten)]
        dataset: DatasetArgs,
        /// Porta do servidor
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Endereço do servidor
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Número de workers (0 = um por CPU)
        #[arg(short, long, default_value = "0")]
        workers: usize,
    },
    /// Carrega os dados e mostra estatísticas
    Check {
        #[command(flatten)]
        dataset: DatasetArgs,
    },
    /// Consulta um bounding box e imprime o resultado em JSON
    Query {
        #[command(flatten)]
        dataset: DatasetArgs,
        #[arg(long, allow_negative_numbers = true)]
        lat_min: f64,
        #[arg(long, allow_negative_numbers = true)]
        lat_max: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon_min: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon_max: f64,
        /// Ano de registro (fecha_alta)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Descompacta os arquivos ZIP do DENUE
    Unpack {
        /// Pasta com os arquivos ZIP
        #[arg(short, long, default_value = "denue-zip")]
        input: String,
        /// Pasta onde os CSVs serão extraídos
        #[arg(short, long, default_value = "datos")]
        output: String,
    },
    /// Exporta a tabela mestra para SQLite
    Export {
        #[command(flatten)]
        dataset: DatasetArgs,
        /// Caminho do banco SQLite
        #[arg(long, default_value = "datos/denue.db")]
        database: String,
    },
}

fn init_logging(quiet: bool, verbose: bool) {
    let nivel = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(nivel)).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Inicializa o módulo de UI com as configurações globais
    ui::init(cli.quiet, cli.verbose);
    init_logging(cli.quiet, cli.verbose);

    match cli.command {
        Commands::Server { dataset, port, host, workers } => {
            let tabela = loader::carregar_ou_vazio(&dataset.layout()?);
            api::start_server(tabela, &host, port, workers).await?;
        }
        Commands::Check { dataset } => {
            ui::print_header("🔎 Verificação dos dados do DENUE");
            let tabela = loader::carregar_dataset(&dataset.layout()?)?;
            let years = tabela.distinct_years();
            ui::print_statistics(&[
                ("Negócios com coordenadas", tabela.len() as u64),
                ("Descartados sem coordenadas", tabela.descartados() as u64),
                ("Anos de registro distintos", years.len() as u64),
            ]);
            if let (Some(primeiro), Some(ultimo)) = (years.first(), years.last()) {
                ui::print_info(&format!("Anos: {} a {}", primeiro, ultimo));
            }
        }
        Commands::Query { dataset, lat_min, lat_max, lon_min, lon_max, year } => {
            // A saída padrão fica só com o JSON
            ui::init(true, false);
            let tabela = loader::carregar_dataset(&dataset.layout()?)?;
            let consulta = Consulta {
                bbox: Bbox { lat_min, lat_max, lon_min, lon_max },
                year,
            };
            let registros = tabela.consultar(&consulta);
            println!("{}", serde_json::to_string_pretty(&registros)?);
        }
        Commands::Unpack { input, output } => {
            archive::unpack_archives(&input, &output, cli.yes)?;
        }
        Commands::Export { dataset, database } => {
            let tabela = loader::carregar_dataset(&dataset.layout()?)?;
            database::exportar(&tabela, &database)?;
        }
    }

    Ok(())
}
