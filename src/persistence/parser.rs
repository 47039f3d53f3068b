use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use crate::domain::{ConsumptionClass, Generator, House, Network};
use crate::error::{LoadError, NetworkError};

/// File sections, in the only order they may appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Section {
    Generators,
    Houses,
    Connections,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Generators => f.write_str("generateur"),
            Section::Houses => f.write_str("maison"),
            Section::Connections => f.write_str("connexion"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Record<'a> {
    Generator { name: &'a str, capacity: &'a str },
    House { name: &'a str, class: &'a str },
    Connection { first: &'a str, second: &'a str },
}

impl Record<'_> {
    fn section(&self) -> Section {
        match self {
            Record::Generator { .. } => Section::Generators,
            Record::House { .. } => Section::Houses,
            Record::Connection { .. } => Section::Connections,
        }
    }
}

/// Split `keyword(a,b).` into a record. `line` is already trimmed.
fn parse_record(line_no: usize, line: &str) -> Result<Record<'_>, LoadError> {
    let body = line
        .strip_suffix('.')
        .ok_or_else(|| LoadError::format(line_no, "line must end with '.'"))?
        .trim_end();

    let open = body
        .find('(')
        .ok_or_else(|| LoadError::format(line_no, "expected KEYWORD(ARG,ARG)."))?;
    let keyword = body[..open].trim().to_lowercase();
    let args = body[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| LoadError::format(line_no, "missing closing parenthesis"))?;

    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(LoadError::format(
            line_no,
            format!("expected 2 arguments, found {}", parts.len()),
        ));
    }
    if parts.iter().any(|p| p.is_empty()) {
        return Err(LoadError::format(line_no, "empty argument"));
    }
    let (first, second) = (parts[0], parts[1]);

    match keyword.as_str() {
        "generateur" | "générateur" => Ok(Record::Generator {
            name: first,
            capacity: second,
        }),
        "maison" => Ok(Record::House {
            name: first,
            class: second,
        }),
        "connexion" => Ok(Record::Connection { first, second }),
        other => Err(LoadError::format(line_no, format!("unknown record '{}'", other))),
    }
}

fn rejected(line: usize) -> impl Fn(NetworkError) -> LoadError {
    move |source| LoadError::Rejected { line, source }
}

/// Build a network from the persisted text format.
///
/// The network is assembled only through the public model operations, and must
/// be valid (every house connected) once the last line is read.
pub fn parse_network(text: &str) -> Result<Network, LoadError> {
    let mut network = Network::new();
    let mut section = Section::Generators;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let record = parse_record(line_no, line)?;
        if record.section() < section {
            return Err(LoadError::format(
                line_no,
                format!("'{}' line after '{}' lines", record.section(), section),
            ));
        }
        section = record.section();

        match record {
            Record::Generator { name, capacity } => {
                let capacity: i64 = capacity.parse().map_err(|_| {
                    LoadError::format(line_no, format!("capacity '{}' is not an integer", capacity))
                })?;
                let generator = Generator::new(name, capacity).map_err(rejected(line_no))?;
                network.add_generator(generator).map_err(rejected(line_no))?;
            }
            Record::House { name, class } => {
                let class = ConsumptionClass::parse(class).map_err(rejected(line_no))?;
                let house = House::new(name, class).map_err(rejected(line_no))?;
                network.add_house(house).map_err(rejected(line_no))?;
            }
            Record::Connection { first, second } => {
                let (h, g) = network
                    .resolve_pair(first, second)
                    .map_err(rejected(line_no))?;
                let house = network.house_at(h).name().to_string();
                let generator = network.generator_at(g).name().to_string();
                network
                    .connect(&house, &generator)
                    .map_err(rejected(line_no))?;
            }
        }
        debug!(line = line_no, "record applied");
    }

    if !network.is_valid() {
        return Err(LoadError::IncompleteNetwork {
            unconnected: network.unconnected().map(|h| h.name().to_string()).collect(),
        });
    }

    info!(
        generators = network.generators().len(),
        houses = network.houses().len(),
        "network parsed"
    );
    Ok(network)
}

/// Read and parse a network file.
pub fn load_network(path: impl AsRef<Path>) -> Result<Network, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_network(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SAMPLE: &str = "\
generateur(G1,100).
generateur(G2,50).

maison(M1,NORMAL).
maison(M2,BASSE).
maison(M3,FORTE).
connexion(G1,M1).
connexion(M2,G2).
connexion(M3,G1).
";

    #[test]
    fn test_parse_complete_network() {
        let net = parse_network(SAMPLE).unwrap();
        assert!(net.is_valid());
        assert_eq!(net.generators().len(), 2);
        assert_eq!(net.houses().len(), 3);
        assert_eq!(net.total_capacity(), 150);
        assert_eq!(net.total_consumption(), 70);
        assert_eq!(net.generator_of("M2").unwrap().name(), "G2");
        assert_eq!(net.generator_of("M3").unwrap().name(), "G1");
    }

    #[test]
    fn test_missing_connection_is_incomplete() {
        let text = SAMPLE.replace("connexion(M3,G1).\n", "");
        match parse_network(&text) {
            Err(LoadError::IncompleteNetwork { unconnected }) => {
                assert_eq!(unconnected, vec!["M3".to_string()]);
            }
            other => panic!("expected IncompleteNetwork, got {:?}", other),
        }
    }

    #[test]
    fn test_normale_alias_and_spacing() {
        let text = "generateur( G1 , 60 ).\n  maison(m1, normale) .\nCONNEXION(g1,M1).";
        let net = parse_network(text).unwrap();
        assert_eq!(net.house("M1").unwrap().class(), ConsumptionClass::Normal);
        assert_eq!(net.generator("G1").unwrap().capacity(), 60);
    }

    #[rstest]
    #[case("generateur(G1,100)", 1)]
    #[case("generateur G1 100.", 1)]
    #[case("generateur(G1,100.", 1)]
    #[case("generateur(G1).", 1)]
    #[case("generateur(G1,100,3).", 1)]
    #[case("generateur(,100).", 1)]
    #[case("generateur(G1,abc).", 1)]
    #[case("centrale(G1,100).", 1)]
    #[case("generateur(G1,100).\n\nmaison(M1,BASSE).\ngenerateur(G2,10).", 4)]
    #[case("generateur(G1,100).\nmaison(M1,BASSE).\nconnexion(M1,G1).\nmaison(M2,BASSE).", 4)]
    fn test_format_errors_report_line(#[case] text: &str, #[case] expected_line: usize) {
        match parse_network(text) {
            Err(LoadError::Format { line, .. }) => assert_eq!(line, expected_line),
            other => panic!("expected a format error, got {:?}", other),
        }
    }

    #[rstest]
    #[case("generateur(G1,0).")]
    #[case("generateur(G1,-10).")]
    #[case("generateur(G1,10).\nmaison(M1,EXTREME).")]
    #[case("generateur(G1,10).\nmaison(M1,FORTE).")]
    #[case("generateur(G1,100).\nmaison(M1,BASSE).\nconnexion(M1,G9).")]
    #[case("generateur(G1,100).\nmaison(M1,BASSE).\nconnexion(M1,G1).\nconnexion(G1,M1).")]
    fn test_model_rejections(#[case] text: &str) {
        let expected_line = text.lines().count();
        match parse_network(text) {
            Err(LoadError::Rejected { line, .. }) => assert_eq!(line, expected_line),
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_is_an_empty_network() {
        let net = parse_network("\n   \n").unwrap();
        assert!(net.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_network("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
