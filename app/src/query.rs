use serde::Deserialize;
use std::collections::BTreeSet;

use crate::error::QueryError;
use crate::models::Registro;

/// Retângulo de latitude/longitude, limites inclusivos.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Bbox {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.lat_min <= lat && lat <= self.lat_max && self.lon_min <= lon && lon <= self.lon_max
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Consulta {
    pub bbox: Bbox,
    pub year: Option<i32>,
}

impl Consulta {
    fn aceita(&self, registro: &Registro) -> bool {
        self.bbox.contains(registro.latitud, registro.longitud)
            && self.year.map_or(true, |year| registro.year_registro == Some(year))
    }
}

/// Parâmetros crus de `/api/datos_negocios`; tudo chega como texto para
/// que a validação devolva mensagens próprias.
#[derive(Debug, Default, Deserialize)]
pub struct ParametrosConsulta {
    pub lat_min: Option<String>,
    pub lat_max: Option<String>,
    pub lon_min: Option<String>,
    pub lon_max: Option<String>,
    pub year: Option<String>,
}

impl ParametrosConsulta {
    pub fn validar(&self) -> Result<Consulta, QueryError> {
        let bbox = Bbox {
            lat_min: parse_limite("lat_min", self.lat_min.as_deref())?,
            lat_max: parse_limite("lat_max", self.lat_max.as_deref())?,
            lon_min: parse_limite("lon_min", self.lon_min.as_deref())?,
            lon_max: parse_limite("lon_max", self.lon_max.as_deref())?,
        };

        let year = match self.year.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(valor) => Some(valor.parse::<i32>().map_err(|_| QueryError::InvalidParameter {
                nome: "year",
                motivo: format!("'{}' não é um ano", valor),
            })?),
        };

        Ok(Consulta { bbox, year })
    }
}

fn parse_limite(nome: &'static str, valor: Option<&str>) -> Result<f64, QueryError> {
    let Some(valor) = valor.map(str::trim).filter(|v| !v.is_empty()) else {
        return Err(QueryError::InvalidParameter {
            nome,
            motivo: "obrigatório".to_string(),
        });
    };

    match valor.parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => Err(QueryError::InvalidParameter {
            nome,
            motivo: format!("'{}' não é um número", valor),
        }),
    }
}

/// Tabela desnormalizada, imutável depois de construída.
#[derive(Debug, Clone, Default)]
pub struct TabelaMestra {
    registros: Vec<Registro>,
    years: Vec<i32>,
    descartados: usize,
}

impl TabelaMestra {
    pub fn new(registros: Vec<Registro>, descartados: usize) -> Self {
        let years: BTreeSet<i32> = registros.iter().filter_map(|r| r.year_registro).collect();
        Self {
            registros,
            years: years.into_iter().collect(),
            descartados,
        }
    }

    pub fn vazia() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.registros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registros.is_empty()
    }

    pub fn descartados(&self) -> usize {
        self.descartados
    }

    pub fn registros(&self) -> &[Registro] {
        &self.registros
    }

    /// Anos de registro presentes, em ordem crescente e sem repetição.
    pub fn distinct_years(&self) -> &[i32] {
        &self.years
    }

    /// Varredura linear; sem paginação nem limite.
    pub fn consultar(&self, consulta: &Consulta) -> Vec<&Registro> {
        self.registros.iter().filter(|r| consulta.aceita(r)).collect()
    }

    /// Caminho usado pela API: sem dados carregados a consulta é um erro.
    pub fn consultar_carregada(&self, consulta: &Consulta) -> Result<Vec<&Registro>, QueryError> {
        if self.is_empty() {
            return Err(QueryError::NoDataLoaded);
        }
        Ok(self.consultar(consulta))
    }
}
