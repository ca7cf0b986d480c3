/// Integration tests driving the labs with values from a parsed configuration file.
use labbook::config::Config;
use labbook::labs::distribution::{sampling_distribution, Statistic};
use labbook::labs::draw::{draw, Side};
use labbook::labs::newton::find_root;
use labbook::labs::sir::simulate;

const CONFIG: &str = r#"
[logging]
level = "warn"

[storage]
data_dir = "data"

[sir]
days = 60
average_contacts = 3.0

[newton]
coefficients = [1.0, 0.0, -2.0]
start = 1.0

[distribution]
values = [0.0, 1.0]
probs = [0.5, 0.5]
sample_size = 2

[draw]
time_slots = ["Mon", "Tue"]
seed = 2024

[[draw.teams]]
name = "Owls"
members = ["Ann", "Bo"]

[[draw.teams]]
name = "Larks"
members = ["Cy"]

[[draw.teams]]
name = "Crows"

[[draw.teams]]
name = "Wrens"
"#;

fn config() -> Config {
    toml::from_str(CONFIG).unwrap()
}

#[test]
fn test_sir_from_config() {
    let cfg = config();
    let series = simulate(&cfg.sir).unwrap();
    assert_eq!(series.len(), 60);
    let (day, peak) = series.peak_infected().unwrap();
    assert!(day > 0);
    assert!(peak > cfg.sir.infected);
}

#[test]
fn test_newton_from_config() {
    let cfg = config();
    let p = cfg.newton.polynomial();
    let dp = p.derivative();
    let root = find_root(|x| p.eval(x), |x| dp.eval(x), cfg.newton.start, 1e-12, 50).unwrap();
    assert!((root - 2f64.sqrt()).abs() < 1e-10);
}

#[test]
fn test_distribution_from_config() {
    let cfg = config();
    let d = &cfg.distribution;
    let mean = sampling_distribution(&d.values, &d.probs, d.sample_size, Statistic::Mean).unwrap();
    assert_eq!(mean.entries, vec![(0.0, 0.25), (0.5, 0.5), (1.0, 0.25)]);
}

#[test]
fn test_draw_from_config() {
    let cfg = config();
    let result = draw(&cfg.draw.teams, &cfg.draw.time_slots, cfg.draw.seed).unwrap();
    assert_eq!(result.groups.len(), 4);
    assert_eq!(result.groups[0].side, Side::Affirmative);
    assert_eq!(result.groups[3].side, Side::Negative);
    assert_eq!(result.matches.len(), 3);
    let again = draw(&cfg.draw.teams, &cfg.draw.time_slots, cfg.draw.seed).unwrap();
    assert_eq!(result, again);
    assert!(result.render().contains("Matches:"));
}
