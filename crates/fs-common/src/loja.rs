use std::cmp::Reverse;
use std::collections::HashMap;

use lazy_static::lazy_static;
use once_cell::sync::Lazy;
use regex::Regex;

lazy_static! {
    /// Nome da loja no ficheiro de origem (minúsculas) → nome no sistema.
    ///
    /// NOTE: manter em sincronia com os registos de lojas; as chaves têm de
    /// estar em minúsculas para a comparação case-insensitive.
    pub static ref LOJA_NAME_OVERRIDES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("paredes ii", "Mycarcenter");
        m.insert("porto alto", "Porto Alto");
        m.insert("portoalto", "Porto Alto");
        // Lojas de Lisboa com nomes próprios
        m.insert("lisboa amoreiras", "Lisboa");
        m.insert("lisboa relogio", "Lisboa Relogio");
        m.insert("lisboa relógio", "Lisboa Relogio");
        m.insert("aeroporto", "Aeroporto");
        m.insert("maiashopping", "MaiaShopping");
        m.insert("maia shopping", "MaiaShopping");
        m.insert("maia zona industrial", "Maia Zona Industrial");
        m.insert("coimbra sul", "Coimbra Sul");
        m.insert("serviço móvel rep. lisboa", "Lisboa SMR");
        m.insert("servico movel rep. lisboa", "Lisboa SMR");
        m.insert("servico movel rep lisboa", "Lisboa SMR");
        m.insert("sm lisboa ii (movida)", "Movida");
        m.insert("sm lisboa ii", "Movida");
        m.insert("porto marquês", "Porto Marquês");
        m.insert("porto marques", "Porto Marquês");
        m.insert("porto zona industrial", "Porto Zona Industrial");
        m.insert("serviço móvel porto (maia)", "SM Porto Maia");
        m.insert("servico movel porto (maia)", "SM Porto Maia");
        m.insert("servico movel porto", "SM Porto Maia");
        m.insert("caldas da rainha", "Caldas da Rainha");
        m.insert("caldas rainha", "Caldas da Rainha");
        m.insert("caldas", "Caldas da Rainha");
        m.insert("castanheira do ribatejo", "Castanheira do Ribatejo");
        m.insert("castanheira", "Castanheira do Ribatejo");
        m.insert("castanheira ribatejo", "Castanheira do Ribatejo");
        m.insert("faro sm", "Faro SM");
        m.insert("sm faro", "Faro SM");
        m.insert("serviço móvel faro", "Faro SM");
        m.insert("servico movel faro", "Faro SM");
        m.insert("leziria sm", "Lezíria SM");
        m.insert("lezíria sm", "Lezíria SM");
        m.insert("leziria do tejo sm", "Lezíria SM");
        m.insert("lezíria do tejo sm", "Lezíria SM");
        m.insert("sm leziria", "Lezíria SM");
        m.insert("sm caldas da rainha", "SM Caldas da Rainha");
        m.insert("sm caldas", "SM Caldas da Rainha");
        m.insert("serviço móvel caldas", "SM Caldas da Rainha");
        m.insert("servico movel caldas", "SM Caldas da Rainha");
        m.insert("serviço móvel caldas da rainha", "SM Caldas da Rainha");
        m.insert("servico movel caldas da rainha", "SM Caldas da Rainha");
        m.insert("vale do tejo sm", "Vale do Tejo SM");
        m.insert("sm vale do tejo", "Vale do Tejo SM");
        m.insert("serviço móvel vale do tejo", "Vale do Tejo SM");
        m.insert("servico movel vale do tejo", "Vale do Tejo SM");
        m.insert("portimão", "Portimão");
        m.insert("portimao", "Portimão");
        m.insert("santarém", "Santarém");
        m.insert("santarem", "Santarém");
        m
    };

    /// Cidades conhecidas para normalização de nomes de loja.
    pub static ref CIDADES_CONHECIDAS: Vec<&'static str> = vec![
        "Abrantes", "Albufeira", "Almada", "Amadora", "Aveiro", "Barcelos", "Braga",
        "Bragança", "Caldas da Rainha", "Caldas", "Cascais", "Castanheira do Ribatejo",
        "Castanheira", "Castelo Branco", "Chaves", "Coimbra", "Covilhã", "Évora",
        "Entroncamento", "Famalicão", "Faro", "Figueira", "Funchal", "Gondomar",
        "Guarda", "Guimarães", "Leiria", "Lezíria", "Lisboa", "Loures", "Maia",
        "Matosinhos", "Montijo", "Odivelas", "Oeiras", "Olhão", "Paredes", "Peniche",
        "Pombal", "Ponte Lima", "Portalegre", "Portimão", "Porto Alto", "Porto",
        "Santarém", "Seixal", "Setúbal", "Sintra", "Tomar", "Torres Vedras",
        "Vale do Tejo", "Viana", "Vila Franca", "Vila Nova Gaia", "Vila Real", "Viseu",
    ];
}

// Per-city matchers, longest name first so "Porto Alto" wins over "Porto".
// City names are plain letters and spaces, so the only escaping needed is
// turning spaces into `\s+`.
static CITY_PATTERNS: Lazy<Vec<(&'static str, Regex, Regex)>> = Lazy::new(|| {
    let mut cidades: Vec<&'static str> = CIDADES_CONHECIDAS.clone();
    cidades.sort_by_key(|cidade| Reverse(cidade.len()));

    cidades
        .into_iter()
        .map(|cidade| {
            let pattern = cidade.split_whitespace().collect::<Vec<_>>().join(r"\s+");
            let bounded = Regex::new(&format!(r"(?i)(?:^|[\s-]){pattern}(?:[\s-]|$)")).unwrap();
            let loose = Regex::new(&format!(r"(?i){pattern}")).unwrap();
            (cidade, bounded, loose)
        })
        .collect()
});

lazy_static! {
    // "Ficha S.Movel 7-Leiria" → cidade depois do hífen
    static ref NMDOS_CITY_RE: Regex = Regex::new(r"(?i)\d+-([a-zà-ú\s]+)").unwrap();
    // "Ficha S.Movel 86-Faro" / "Ficha S.Movel 86" → número antes do hífen
    static ref SM_NUMBER_RE: Regex = Regex::new(r"(?i)(?:s\.?movel|smovel|movel)\s*(\d+)").unwrap();
    // "Ficha Servico 23" → número da loja
    static ref SERVICO_NUMBER_RE: Regex = Regex::new(r"(?i)ficha\s*servi[cç]o\s*(\d+)").unwrap();
}

/// Deteta unidades de serviço móvel a partir de qualquer um dos campos.
pub fn is_servico_movel(nmdos: &str, loja: &str) -> bool {
    let combined = format!("{nmdos} {loja}").to_lowercase();
    combined.contains("s.movel")
        || combined.contains("smovel")
        || combined.contains("serviço móvel")
        || combined.contains("servico movel")
        || combined.contains("sm ")
}

/// Extrai a cidade do nome da loja ou do campo `nmdos`.
///
/// Tenta primeiro um match delimitado (para "Porto" não apanhar
/// "Portimão" nem "Porto Alto"), depois um match solto, e por fim o
/// padrão `<dígitos>-<cidade>` do `nmdos`.
pub fn extract_cidade(nmdos: &str, loja: &str) -> Option<String> {
    let combined = format!("{nmdos} {loja}");

    for (cidade, bounded, _) in CITY_PATTERNS.iter() {
        if bounded.is_match(&combined) {
            return Some((*cidade).to_string());
        }
    }

    for (cidade, _, loose) in CITY_PATTERNS.iter() {
        if loose.is_match(&combined) {
            return Some((*cidade).to_string());
        }
    }

    NMDOS_CITY_RE
        .captures(nmdos)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|cidade| !cidade.is_empty())
}

/// Número da loja a partir do campo `nmdos`.
///
/// Serviço móvel usa o número colado ao marcador ("S.Movel 86-Faro" → 86,
/// que corresponde ao número da loja no sistema); lojas fixas usam o
/// padrão "Ficha Servico <n>". Só números positivos contam.
pub fn extract_loja_number(nmdos: &str) -> Option<u32> {
    let lowered = nmdos.to_lowercase();
    let re = if lowered.contains("movel") {
        &*SM_NUMBER_RE
    } else {
        &*SERVICO_NUMBER_RE
    };

    re.captures(nmdos)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n > 0)
}

fn strip_sm_tokens(loja: &str) -> String {
    lazy_static! {
        static ref SM_TOKEN_RES: Vec<Regex> = vec![
            Regex::new(r"(?i)serviço\s*móvel").unwrap(),
            Regex::new(r"(?i)servico\s*movel").unwrap(),
            Regex::new(r"(?i)s\.?movel").unwrap(),
            Regex::new(r"(?i)sm\s*").unwrap(),
        ];
    }

    let mut base = loja.to_string();
    for re in SM_TOKEN_RES.iter() {
        base = re.replace_all(&base, "").into_owned();
    }
    base.trim().to_string()
}

/// Normaliza o nome da loja para a chave usada no sistema.
///
/// Ordem de decisão: tabela de overrides, depois serviço móvel com cidade
/// ("<Cidade> SM"), depois serviço móvel sem cidade (nome sem os
/// marcadores SM + " SM"), depois loja fixa reduzida à cidade quando o
/// nome a contém, e por fim o nome original.
pub fn normalize_loja_name(nmdos: &str, loja: &str) -> String {
    let key = loja.trim().to_lowercase();
    if let Some(mapped) = LOJA_NAME_OVERRIDES.get(key.as_str()) {
        return (*mapped).to_string();
    }

    let cidade = extract_cidade(nmdos, loja);

    if is_servico_movel(nmdos, loja) {
        if let Some(cidade) = cidade {
            return format!("{cidade} SM");
        }

        let base = strip_sm_tokens(loja);
        return if base.is_empty() {
            format!("{} SM", loja.trim())
        } else {
            format!("{base} SM")
        };
    }

    if let Some(cidade) = cidade {
        if loja.to_lowercase().contains(&cidade.to_lowercase()) {
            return cidade;
        }
    }

    loja.trim().to_string()
}
