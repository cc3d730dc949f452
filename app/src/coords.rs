use crate::models::{LinhaUnida, Registro};

/// Converte uma célula de latitude/longitude; valores não numéricos ou não
/// finitos viram `None`.
pub fn coerce(valor: &str) -> Option<f64> {
    valor
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

impl Registro {
    pub fn from_linha(linha: LinhaUnida) -> Option<Self> {
        Some(Registro {
            latitud: linha.latitud?,
            longitud: linha.longitud?,
            dados: linha.dados,
            year_registro: linha.year_registro,
        })
    }
}

/// Remove de vez as linhas sem latitude ou longitude.
/// Retorna os registros mantidos e quantas linhas foram descartadas.
pub fn sanitize(linhas: Vec<LinhaUnida>) -> (Vec<Registro>, usize) {
    let total = linhas.len();
    let registros: Vec<Registro> = linhas.into_iter().filter_map(Registro::from_linha).collect();
    let descartados = total - registros.len();
    (registros, descartados)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DadosNegocio;

    fn linha(lat: Option<f64>, lon: Option<f64>) -> LinhaUnida {
        LinhaUnida {
            dados: DadosNegocio::default(),
            latitud: lat,
            longitud: lon,
            year_registro: None,
        }
    }

    #[test]
    fn coerce_parses_numbers_and_rejects_the_rest() {
        assert_eq!(coerce("19.4326"), Some(19.4326));
        assert_eq!(coerce(" -99.1332 "), Some(-99.1332));
        assert_eq!(coerce(""), None);
        assert_eq!(coerce("N/D"), None);
        assert_eq!(coerce("NaN"), None);
        assert_eq!(coerce("inf"), None);
    }

    #[test]
    fn sanitize_drops_rows_missing_either_coordinate() {
        let linhas = vec![
            linha(Some(19.4), Some(-99.1)),
            linha(None, Some(-99.1)),
            linha(Some(19.4), None),
            linha(None, None),
            linha(Some(20.6), Some(-103.3)),
        ];

        let (registros, descartados) = sanitize(linhas);

        assert_eq!(registros.len(), 2);
        assert_eq!(descartados, 3);
        assert_eq!(registros[0].latitud, 19.4);
        assert_eq!(registros[1].longitud, -103.3);
    }
}
