use actix_web::{middleware, web, HttpResponse, Result as ActixResult};

use crate::error::QueryError;
use crate::query::{ParametrosConsulta, TabelaMestra};
use crate::ui;

const INDEX_HTML: &str = include_str!("../static/index.html");

pub async fn index(tabela: web::Data<TabelaMestra>) -> HttpResponse {
    let pagina = INDEX_HTML.replace("{{num_negocios}}", &tabela.len().to_string());
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pagina)
}

pub async fn years_disponibles(tabela: web::Data<TabelaMestra>) -> HttpResponse {
    HttpResponse::Ok().json(tabela.distinct_years())
}

pub async fn datos_negocios(
    params: web::Query<ParametrosConsulta>,
    tabela: web::Data<TabelaMestra>,
) -> Result<HttpResponse, QueryError> {
    let consulta = params.validar().map_err(|e| {
        log::debug!("consulta rejeitada: {}", e);
        e
    })?;

    let registros = tabela.consultar_carregada(&consulta)?;
    log::debug!(
        "bbox [{}, {}] x [{}, {}] ano {:?}: {} registros",
        consulta.bbox.lat_min,
        consulta.bbox.lat_max,
        consulta.bbox.lon_min,
        consulta.bbox.lon_max,
        consulta.year,
        registros.len()
    );

    Ok(HttpResponse::Ok().json(registros))
}

async fn health_check(tabela: web::Data<TabelaMestra>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "registros": tabela.len(),
        "descartados": tabela.descartados(),
    })))
}

/// Erros de desserialização da query string também respondem em JSON.
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        log::debug!("query string rejeitada: {}", err);
        QueryError::MalformedQuery(err.to_string()).into()
    })
}

pub fn configurar(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config())
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .route("/api/years_disponibles", web::get().to(years_disponibles))
        .route("/api/datos_negocios", web::get().to(datos_negocios));
}

pub async fn start_server(tabela: TabelaMestra, host: &str, port: u16, workers: usize) -> anyhow::Result<()> {
    let registros = tabela.len();
    // Construída antes do servidor subir e nunca mais muda, então não há lock
    let tabela = web::Data::new(tabela);

    let address = format!("{}:{}", host, port);
    let workers = if workers == 0 { num_cpus::get() } else { workers };

    ui::print_header("🗺️  Servidor do mapa de negócios");
    if registros == 0 {
        ui::print_warning("Nenhum negócio carregado: /api/datos_negocios responderá 500.");
    }
    ui::print_success(&format!("Servidor iniciando em http://{} ({} workers)", address, workers));
    ui::print_info("Endpoints disponíveis:");
    use colored::Colorize;
    println!("  {} GET /                        - Mapa", "•".cyan());
    println!("  {} GET /api/years_disponibles   - Anos de registro disponíveis", "•".cyan());
    println!("  {} GET /api/datos_negocios      - Negócios dentro de um bbox", "•".cyan());
    println!("  {} GET /health                  - Verifica status do servidor", "•".cyan());
    ui::print_verbose(&format!(
        "Exemplo: curl 'http://{}/api/datos_negocios?lat_min=19.3&lat_max=19.5&lon_min=-99.2&lon_max=-99.0&year=2019'",
        address
    ));
    ui::print_separator();

    actix_web::HttpServer::new(move || {
        actix_web::App::new()
            .wrap(middleware::Logger::default())
            .app_data(tabela.clone())
            .configure(configurar)
    })
    .bind(&address)?
    .workers(workers)
    .run()
    .await?;

    Ok(())
}
