use serde::Serialize;

/// Linha da tabela de fatos `establecimientos`, já tipada.
#[derive(Debug, Clone, PartialEq)]
pub struct Estabelecimento {
    pub id_cliente: Option<String>,
    pub nom_estab: Option<String>,
    pub raz_social: Option<String>,
    pub codigo_act: Option<String>,
    pub cve_mun: Option<String>,
    pub cve_loc: Option<String>,
    pub fecha_alta: Option<String>,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Endereco {
    pub cod_postal: Option<String>,
    pub cve_tipo_asent: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contato {
    pub telefono: Option<String>,
    pub correoelec: Option<String>,
    pub www: Option<String>,
}

/// Atributos de um negócio depois de todos os joins.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DadosNegocio {
    #[serde(skip)]
    pub id_cliente: Option<String>,
    pub nom_estab: Option<String>,
    pub raz_social: Option<String>,
    pub municipio: Option<String>,
    pub localidad: Option<String>,
    pub nombre_act: Option<String>,
    pub tipo_asent: Option<String>,
    pub telefono: Option<String>,
    pub correoelec: Option<String>,
    pub www: Option<String>,
    pub cod_postal: Option<String>,
}

/// Saída do join, antes da limpeza de coordenadas.
#[derive(Debug, Clone, PartialEq)]
pub struct LinhaUnida {
    pub dados: DadosNegocio,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    pub year_registro: Option<i32>,
}

/// Registro da tabela mestra: coordenadas sempre presentes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registro {
    #[serde(flatten)]
    pub dados: DadosNegocio,
    pub latitud: f64,
    pub longitud: f64,
    pub year_registro: Option<i32>,
}
