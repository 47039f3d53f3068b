use grid_allocator::optimizer::GeneratorLoad;
use grid_allocator::persistence::{load_network, parse_network, save_network};
use grid_allocator::{
    ConsumptionClass, CostModel, Generator, House, LoadError, Network, NetworkError,
    SequentialDescent, SearchStrategy, TiePolicy,
};
use rstest::rstest;

const EPSILON: f64 = 1e-9;

fn network(generators: &[(&str, i64)], houses: &[(&str, ConsumptionClass, &str)]) -> Network {
    let mut net = Network::new();
    for (name, capacity) in generators {
        net.add_generator(Generator::new(*name, *capacity).unwrap()).unwrap();
    }
    for (name, class, generator) in houses {
        net.add_house(House::new(*name, *class).unwrap()).unwrap();
        net.connect(name, generator).unwrap();
    }
    net
}

#[test]
fn balanced_pair_costs_nothing() {
    let net = network(
        &[("G1", 100), ("G2", 100)],
        &[
            ("M1", ConsumptionClass::High, "G1"),
            ("M2", ConsumptionClass::High, "G2"),
        ],
    );
    let cost = CostModel::default();

    assert!((cost.dispersion(&net) - 0.0).abs() < EPSILON);
    assert!((cost.surcharge(&net) - 0.0).abs() < EPSILON);
    assert!((cost.cost(&net) - 0.0).abs() < EPSILON);
}

#[test]
fn uneven_pair_costs_its_dispersion() {
    let net = network(
        &[("G1", 100), ("G2", 100)],
        &[
            ("M1", ConsumptionClass::High, "G1"),
            ("M2", ConsumptionClass::High, "G1"),
        ],
    );
    let cost = CostModel::default();

    assert!((cost.utilization(&net, "G1") - 0.8).abs() < EPSILON);
    assert!((cost.utilization(&net, "G2") - 0.0).abs() < EPSILON);
    assert!((cost.dispersion(&net) - 0.8).abs() < EPSILON);
    assert!((cost.surcharge(&net) - 0.0).abs() < EPSILON);
    assert!((cost.cost(&net) - 0.8).abs() < EPSILON);
}

#[test]
fn lone_overloaded_generator_costs_its_surcharge() {
    // 50 kW on a 40 kW generator cannot be built through the checked model,
    // so it is evaluated straight from the load figures
    let loads = [GeneratorLoad::new(50, 40)];
    let cost = CostModel::default();

    assert!((loads[0].utilization() - 1.25).abs() < EPSILON);
    assert!((loads[0].overload() - 0.25).abs() < EPSILON);
    assert!((cost.cost_of(&loads) - 2.5).abs() < EPSILON);
}

#[test]
fn capacity_rejection_leaves_network_untouched() {
    let mut net = Network::new();
    net.add_generator(Generator::new("G1", 30).unwrap()).unwrap();
    net.add_house(House::new("M1", ConsumptionClass::Normal).unwrap())
        .unwrap();

    let err = net
        .add_house(House::new("M2", ConsumptionClass::Normal).unwrap())
        .unwrap_err();

    assert_eq!(
        err,
        NetworkError::CapacityExceeded {
            consumption: 40,
            capacity: 30
        }
    );
    assert_eq!(net.houses().len(), 1);
    assert_eq!(net.total_consumption(), 20);
    assert_eq!(net.total_capacity(), 30);
}

#[test]
fn loaded_file_descends_to_a_balanced_assignment() {
    let text = "\
generateur(G1,60).
generateur(G2,60).
maison(M1,NORMAL).
maison(M2,NORMAL).
maison(M3,NORMAL).
connexion(G1,M1).
connexion(G1,M2).
connexion(G1,M3).
";
    let net = parse_network(text).unwrap();
    let cost = CostModel::default();
    assert!(net.is_valid());
    assert!((cost.cost(&net) - 1.0).abs() < EPSILON);

    let report = SequentialDescent::new(TiePolicy::Reject, 16).search(net, &cost);

    assert!(report.converged);
    assert!(report.final_cost < report.initial_cost);
    let g1 = report.network.generator_id("G1").unwrap();
    let g2 = report.network.generator_id("G2").unwrap();
    let mut loads = [report.network.load(g1), report.network.load(g2)];
    loads.sort_unstable();
    assert_eq!(loads, [20, 40]);
    assert!(report.network.is_valid());
}

#[rstest]
#[case::missing_connection(
    "generateur(G1,60).\nmaison(M1,BASSE).\n",
    "incomplete"
)]
#[case::unknown_keyword("centrale(G1,60).\n", "line 1")]
#[case::out_of_order(
    "maison(M1,BASSE).\ngenerateur(G1,60).\n",
    "line 2"
)]
#[case::bad_class(
    "generateur(G1,60).\nmaison(M1,ENORME).\n",
    "line 2"
)]
fn malformed_files_are_rejected(#[case] text: &str, #[case] needle: &str) {
    let err = parse_network(text).unwrap_err();
    assert!(
        err.to_string().to_lowercase().contains(needle),
        "{} does not mention {}",
        err,
        needle
    );
}

#[test]
fn missing_file_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_network(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn saved_file_reloads_identically() {
    let net = network(
        &[("Nord", 80), ("Sud", 120)],
        &[
            ("A", ConsumptionClass::Low, "Nord"),
            ("B", ConsumptionClass::High, "Sud"),
            ("C", ConsumptionClass::Normal, "nord"),
        ],
    );
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.txt");

    save_network(&path, &net).unwrap();
    let reloaded = load_network(&path).unwrap();

    assert_eq!(reloaded.to_string(), net.to_string());
    assert_eq!(reloaded.generator_of("c").unwrap().name(), "Nord");
}
