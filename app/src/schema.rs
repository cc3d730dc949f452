// Nomes de colunas dos arquivos do DENUE e pares de chaves dos joins.

pub const ID_CLIENTE: &str = "id_cliente";
pub const NOM_ESTAB: &str = "nom_estab";
pub const RAZ_SOCIAL: &str = "raz_social";
pub const FECHA_ALTA: &str = "fecha_alta";
pub const LATITUD: &str = "latitud";
pub const LONGITUD: &str = "longitud";

pub const NOM_MUN: &str = "nom_mun";
pub const NOM_LOC: &str = "nom_loc";
pub const NOMBRE_ACT: &str = "nombre_act";
pub const TIPO_ASENT: &str = "tipo_asent";

pub const COD_POSTAL: &str = "cod_postal";
pub const TELEFONO: &str = "telefono";
pub const CORREOELEC: &str = "correoelec";
pub const WWW: &str = "www";

/// Par de colunas de um left join: `esquerda` na tabela da esquerda,
/// `direita` na tabela que é unida.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinKey {
    pub tabela: &'static str,
    pub esquerda: &'static str,
    pub direita: &'static str,
}

pub const MUNICIPIO: JoinKey = JoinKey {
    tabela: "municipios",
    esquerda: "cve_mun",
    direita: "cve_mun",
};

pub const LOCALIDAD: JoinKey = JoinKey {
    tabela: "localidades",
    esquerda: "cve_loc",
    direita: "cve_loc",
};

pub const DOMICILIO: JoinKey = JoinKey {
    tabela: "domicilios",
    esquerda: ID_CLIENTE,
    direita: ID_CLIENTE,
};

/// Segundo passo do join de endereço: a chave da esquerda vem de `domicilios`.
pub const TIPO_ASENTAMIENTO: JoinKey = JoinKey {
    tabela: "tipos_asentamiento",
    esquerda: "cve_tipo_asent",
    direita: "cve_tipo_asent",
};

pub const ACTIVIDAD: JoinKey = JoinKey {
    tabela: "actividades",
    esquerda: "codigo_act",
    direita: "codigo_act",
};

pub const CONTACTO: JoinKey = JoinKey {
    tabela: "contactos",
    esquerda: ID_CLIENTE,
    direita: ID_CLIENTE,
};

/// Colunas lidas da tabela de fatos.
pub const COLUNAS_ESTABELECIMENTO: [&str; 9] = [
    ID_CLIENTE,
    NOM_ESTAB,
    RAZ_SOCIAL,
    ACTIVIDAD.esquerda,
    MUNICIPIO.esquerda,
    LOCALIDAD.esquerda,
    FECHA_ALTA,
    LATITUD,
    LONGITUD,
];
