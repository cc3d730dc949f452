// Arquivos de exemplo do DENUE para os testes.

use std::fs;
use std::path::Path;

use crate::models::{DadosNegocio, Registro};
use crate::query::TabelaMestra;

fn escrever_latin1(dir: &Path, nome: &str, conteudo: &str) {
    let (bytes, _, com_erros) = encoding_rs::WINDOWS_1252.encode(conteudo);
    assert!(!com_erros, "fixture com caracteres fora do Latin1: {}", nome);
    fs::write(dir.join(nome), bytes).unwrap();
}

/// Layout padrão em Latin1 com quatro estabelecimentos; o de id 4 não tem
/// coordenadas válidas.
pub fn escrever_dataset(dir: &Path) {
    escrever_latin1(
        dir,
        "establecimientos.csv",
        "id_cliente,nom_estab,raz_social,codigo_act,cve_mun,cve_loc,fecha_alta,latitud,longitud,per_ocu\n\
         1,Abarrotes Doña Tere,TERESA LÓPEZ,461110,001,0001,2019-07,19.4326,-99.1332,0 a 5\n\
         2,Farmacia San Pablo,FARMACIA SAN PABLO SA DE CV,464111,002,0001,2014-12,19.4845,-99.1860,11 a 30\n\
         3,Taller Eléctrico,,811111,999,0001,,19.4150,-99.1620,0 a 5\n\
         4,Sin Ubicación,,461110,001,0001,2019-07,N/D,-99.1000,0 a 5\n",
    );
    escrever_latin1(
        dir,
        "municipios.csv",
        "cve_mun,nom_mun\n001,Cuauhtémoc\n002,Azcapotzalco\n",
    );
    escrever_latin1(dir, "localidades.csv", "cve_loc,nom_loc\n0001,Ciudad de México\n");
    escrever_latin1(
        dir,
        "actividades.csv",
        "codigo_act,nombre_act\n\
         461110,Comercio al por menor en tiendas de abarrotes\n\
         464111,Farmacias sin minisúper\n",
    );
    escrever_latin1(
        dir,
        "tipos_asentamiento.csv",
        "cve_tipo_asent,tipo_asent\n10,COLONIA\n20,BARRIO\n",
    );
    escrever_latin1(
        dir,
        "domicilios.csv",
        "id_cliente,cod_postal,cve_tipo_asent\n1,06000,10\n2,02000,20\n",
    );
    escrever_latin1(
        dir,
        "contactos.csv",
        "id_cliente,telefono,correoelec,www\n1,5512345678,,\n2,5598765432,contacto@sanpablo.mx,www.farmaciasanpablo.com.mx\n",
    );
}

/// Mesmo layout em UTF-8 e separado por `|`, com um único estabelecimento.
pub fn escrever_dataset_utf8_pipe(dir: &Path) {
    let arquivos = [
        (
            "establecimientos.csv",
            "id_cliente|nom_estab|raz_social|codigo_act|cve_mun|cve_loc|fecha_alta|latitud|longitud\n\
             1|Café Tacuba||722511|001|0001|2010-01|19.4361|-99.1394\n",
        ),
        ("municipios.csv", "cve_mun|nom_mun\n001|Cuauhtémoc\n"),
        ("localidades.csv", "cve_loc|nom_loc\n0001|Ciudad de México\n"),
        ("actividades.csv", "codigo_act|nombre_act\n722511|Restaurantes con servicio de preparación de alimentos a la carta\n"),
        ("tipos_asentamiento.csv", "cve_tipo_asent|tipo_asent\n10|COLONIA\n"),
        ("domicilios.csv", "id_cliente|cod_postal|cve_tipo_asent\n1|06000|10\n"),
        ("contactos.csv", "id_cliente|telefono|correoelec|www\n"),
    ];
    for (nome, conteudo) in arquivos {
        fs::write(dir.join(nome), conteudo).unwrap();
    }
}

pub fn registro(nome: &str, municipio: Option<&str>, lat: f64, lon: f64, year: Option<i32>) -> Registro {
    Registro {
        dados: DadosNegocio {
            id_cliente: Some(nome.to_lowercase()),
            nom_estab: Some(nome.to_string()),
            municipio: municipio.map(str::to_string),
            ..DadosNegocio::default()
        },
        latitud: lat,
        longitud: lon,
        year_registro: year,
    }
}

pub fn tabela_exemplo() -> TabelaMestra {
    TabelaMestra::new(
        vec![
            registro("Zócalo", Some("Cuauhtémoc"), 19.4326, -99.1332, Some(2019)),
            registro("Azcapotzalco", Some("Azcapotzalco"), 19.4845, -99.1860, Some(2014)),
            registro("Guadalajara", None, 20.6597, -103.3496, None),
        ],
        1,
    )
}
