use std::collections::HashMap;

use crate::error::LoadError;
use crate::models::{Contato, DadosNegocio, Endereco, Estabelecimento, LinhaUnida};
use crate::utils;

/// Normaliza uma chave de join. Chaves só com dígitos perdem os zeros à
/// esquerda, de modo que `"001"` e `"1"` se encontram.
pub fn normalize_key(raw: &str) -> Option<String> {
    let chave = raw.trim();
    if chave.is_empty() {
        return None;
    }
    if chave.bytes().all(|b| b.is_ascii_digit()) {
        let sem_zeros = chave.trim_start_matches('0');
        return Some(if sem_zeros.is_empty() { "0" } else { sem_zeros }.to_string());
    }
    Some(chave.to_string())
}

/// Tabela do lado direito de um join, indexada pela chave.
/// A unicidade da chave é verificada na construção.
#[derive(Debug, Clone)]
pub struct KeyedTable<V> {
    nome: &'static str,
    linhas: HashMap<String, V>,
}

/// Catálogo código → descrição.
pub type Dicionario = KeyedTable<Option<String>>;

impl<V> KeyedTable<V> {
    pub fn from_rows<I>(nome: &'static str, rows: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = (String, V)>,
    {
        let mut linhas = HashMap::new();
        for (raw, valor) in rows {
            // Sem chave a linha nunca seria encontrada
            let Some(chave) = normalize_key(&raw) else {
                continue;
            };
            if linhas.contains_key(&chave) {
                return Err(LoadError::DuplicateKey { tabela: nome, chave });
            }
            linhas.insert(chave, valor);
        }
        Ok(Self { nome, linhas })
    }

    pub fn get(&self, chave: Option<&str>) -> Option<&V> {
        let chave = normalize_key(chave?)?;
        self.linhas.get(&chave)
    }

    pub fn nome(&self) -> &'static str {
        self.nome
    }

    pub fn len(&self) -> usize {
        self.linhas.len()
    }
}

impl Dicionario {
    pub fn descricao(&self, codigo: Option<&str>) -> Option<String> {
        self.get(codigo).cloned().flatten()
    }
}

/// Todas as tabelas unidas à tabela de fatos.
#[derive(Debug, Clone)]
pub struct Catalogos {
    pub municipios: Dicionario,
    pub localidades: Dicionario,
    pub domicilios: KeyedTable<Endereco>,
    pub tipos_asentamiento: Dicionario,
    pub actividades: Dicionario,
    pub contactos: KeyedTable<Contato>,
}

impl Catalogos {
    pub fn estatisticas(&self) -> Vec<(&'static str, u64)> {
        vec![
            (self.municipios.nome(), self.municipios.len() as u64),
            (self.localidades.nome(), self.localidades.len() as u64),
            (self.domicilios.nome(), self.domicilios.len() as u64),
            (self.tipos_asentamiento.nome(), self.tipos_asentamiento.len() as u64),
            (self.actividades.nome(), self.actividades.len() as u64),
            (self.contactos.nome(), self.contactos.len() as u64),
        ]
    }
}

/// Aplica os left joins sobre `establecimientos`: municipio, localidad,
/// domicilio (e por ele tipo_asentamiento), actividad e contacto.
/// Cada estabelecimento produz exatamente uma linha.
pub fn left_join_all(estabelecimentos: Vec<Estabelecimento>, catalogos: &Catalogos) -> Vec<LinhaUnida> {
    log::debug!("left join de {} estabelecimentos", estabelecimentos.len());
    estabelecimentos
        .into_iter()
        .map(|estab| unir(estab, catalogos))
        .collect()
}

fn unir(estab: Estabelecimento, catalogos: &Catalogos) -> LinhaUnida {
    let municipio = catalogos.municipios.descricao(estab.cve_mun.as_deref());
    let localidad = catalogos.localidades.descricao(estab.cve_loc.as_deref());

    let endereco = catalogos.domicilios.get(estab.id_cliente.as_deref());
    let cod_postal = endereco.and_then(|e| e.cod_postal.clone());
    let tipo_asent = endereco.and_then(|e| {
        catalogos
            .tipos_asentamiento
            .descricao(e.cve_tipo_asent.as_deref())
    });

    let nombre_act = catalogos.actividades.descricao(estab.codigo_act.as_deref());

    let contato = catalogos.contactos.get(estab.id_cliente.as_deref());

    let year_registro = estab.fecha_alta.as_deref().and_then(utils::parse_year);

    LinhaUnida {
        dados: DadosNegocio {
            id_cliente: estab.id_cliente,
            nom_estab: estab.nom_estab,
            raz_social: estab.raz_social,
            municipio,
            localidad,
            nombre_act,
            tipo_asent,
            telefono: contato.and_then(|c| c.telefono.clone()),
            correoelec: contato.and_then(|c| c.correoelec.clone()),
            www: contato.and_then(|c| c.www.clone()),
            cod_postal,
        },
        latitud: estab.latitud,
        longitud: estab.longitud,
        year_registro,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dicionario(nome: &'static str, linhas: &[(&str, &str)]) -> Dicionario {
        KeyedTable::from_rows(
            nome,
            linhas
                .iter()
                .map(|(k, v)| (k.to_string(), utils::texto(v))),
        )
        .unwrap()
    }

    fn estabelecimento(id: &str, cve_mun: &str) -> Estabelecimento {
        Estabelecimento {
            id_cliente: Some(id.to_string()),
            nom_estab: Some(format!("Negocio {}", id)),
            raz_social: None,
            codigo_act: Some("461110".to_string()),
            cve_mun: Some(cve_mun.to_string()),
            cve_loc: Some("0001".to_string()),
            fecha_alta: Some("2019-07".to_string()),
            latitud: Some(19.4),
            longitud: Some(-99.1),
        }
    }

    fn catalogos() -> Catalogos {
        Catalogos {
            municipios: dicionario("municipios", &[("001", "Cuauhtémoc"), ("002", "Azcapotzalco")]),
            localidades: dicionario("localidades", &[("1", "Ciudad de México")]),
            domicilios: KeyedTable::from_rows(
                "domicilios",
                vec![(
                    "1".to_string(),
                    Endereco {
                        cod_postal: Some("06000".to_string()),
                        cve_tipo_asent: Some("10".to_string()),
                    },
                )],
            )
            .unwrap(),
            tipos_asentamiento: dicionario("tipos_asentamiento", &[("10", "COLONIA")]),
            actividades: dicionario("actividades", &[("461110", "Comercio al por menor en tiendas de abarrotes")]),
            contactos: KeyedTable::from_rows(
                "contactos",
                vec![(
                    "2".to_string(),
                    Contato {
                        telefono: Some("5555555555".to_string()),
                        correoelec: None,
                        www: Some("www.ejemplo.mx".to_string()),
                    },
                )],
            )
            .unwrap(),
        }
    }

    #[test]
    fn normalize_key_strips_leading_zeros_of_numeric_keys() {
        assert_eq!(normalize_key("001"), Some("1".to_string()));
        assert_eq!(normalize_key(" 1 "), Some("1".to_string()));
        assert_eq!(normalize_key("000"), Some("0".to_string()));
        assert_eq!(normalize_key("A01"), Some("A01".to_string()));
        assert_eq!(normalize_key("  "), None);
    }

    #[test]
    fn duplicate_right_side_key_is_rejected() {
        let result = KeyedTable::from_rows(
            "municipios",
            vec![("001".to_string(), 1), ("1".to_string(), 2)],
        );
        match result {
            Err(LoadError::DuplicateKey { tabela, chave }) => {
                assert_eq!(tabela, "municipios");
                assert_eq!(chave, "1");
            }
            other => panic!("esperava chave duplicada, veio {:?}", other),
        }
    }

    #[test]
    fn rows_without_key_are_ignored() {
        let tabela = KeyedTable::from_rows("municipios", vec![("".to_string(), 1), (" ".to_string(), 2)]).unwrap();
        assert_eq!(tabela.len(), 0);
        assert_eq!(tabela.get(Some("")), None);
        assert_eq!(tabela.get(None), None);
    }

    #[test]
    fn matched_codes_resolve_dictionary_labels() {
        let linhas = left_join_all(vec![estabelecimento("1", "001")], &catalogos());
        let dados = &linhas[0].dados;

        assert_eq!(dados.municipio.as_deref(), Some("Cuauhtémoc"));
        assert_eq!(dados.localidad.as_deref(), Some("Ciudad de México"));
        assert_eq!(dados.cod_postal.as_deref(), Some("06000"));
        assert_eq!(dados.tipo_asent.as_deref(), Some("COLONIA"));
        assert_eq!(
            dados.nombre_act.as_deref(),
            Some("Comercio al por menor en tiendas de abarrotes")
        );
        assert_eq!(linhas[0].year_registro, Some(2019));
    }

    #[test]
    fn unmatched_codes_yield_null_labels() {
        let linhas = left_join_all(vec![estabelecimento("9", "999")], &catalogos());
        let dados = &linhas[0].dados;

        assert_eq!(dados.municipio, None);
        assert_eq!(dados.cod_postal, None);
        assert_eq!(dados.tipo_asent, None);
        assert_eq!(dados.telefono, None);
        assert_eq!(dados.nom_estab.as_deref(), Some("Negocio 9"));
    }

    #[test]
    fn contact_join_fills_contact_fields() {
        let linhas = left_join_all(vec![estabelecimento("02", "002")], &catalogos());
        let dados = &linhas[0].dados;

        assert_eq!(dados.municipio.as_deref(), Some("Azcapotzalco"));
        assert_eq!(dados.telefono.as_deref(), Some("5555555555"));
        assert_eq!(dados.correoelec, None);
        assert_eq!(dados.www.as_deref(), Some("www.ejemplo.mx"));
    }

    #[test]
    fn join_preserves_left_row_count() {
        let fatos: Vec<_> = (1..=50).map(|i| estabelecimento(&i.to_string(), "001")).collect();
        let linhas = left_join_all(fatos, &catalogos());
        assert_eq!(linhas.len(), 50);
    }
}
