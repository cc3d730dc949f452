use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::path::PathBuf;
use thiserror::Error;

/// Falhas ao montar a tabela mestra na inicialização.
///
/// Nenhuma delas é fatal para o servidor: `loader::carregar_ou_vazio`
/// registra o erro e segue com uma tabela vazia.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("arquivo de dados não encontrado: {0:?}")]
    MissingFile(PathBuf),

    #[error("nenhum arquivo de estabelecimentos corresponde a {0:?}")]
    NoFactFiles(String),

    #[error("padrão de arquivo inválido: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("coluna '{coluna}' ausente em {arquivo:?}")]
    MissingColumn { arquivo: PathBuf, coluna: String },

    #[error("falha ao ler {arquivo:?}: {source}")]
    Io {
        arquivo: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV malformado em {arquivo:?}: {source}")]
    Csv {
        arquivo: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("chave '{chave}' duplicada na tabela {tabela}")]
    DuplicateKey { tabela: &'static str, chave: String },
}

/// Erros de uma consulta por bounding box.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("parâmetro '{nome}' inválido: {motivo}")]
    InvalidParameter { nome: &'static str, motivo: String },

    #[error("query string inválida: {0}")]
    MalformedQuery(String),

    #[error("nenhum dado carregado")]
    NoDataLoaded,
}

impl ResponseError for QueryError {
    fn status_code(&self) -> StatusCode {
        match self {
            QueryError::InvalidParameter { .. } | QueryError::MalformedQuery(_) => StatusCode::BAD_REQUEST,
            QueryError::NoDataLoaded => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
