use anyhow::anyhow;
use clap::Parser;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(
    name = "Rust JPS",
    about = "Jump Point Search and A* on weighted grid maps.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long = "map", help = "Path to a map file; its scenario is <map>.scen")]
    pub maps: Vec<String>,

    #[arg(long, help = "Number of scenario cases to run per map")]
    pub cases: Option<usize>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Sample cases randomly instead of taking the first ones")]
    pub shuffle: bool,

    #[arg(long, help = "Directory for rendered path images")]
    pub output_dir: Option<String>,

    #[arg(long, help = "Write a JSON report of every case to this file")]
    pub results_path: Option<String>,

    #[arg(long, help = "Skip writing path images")]
    pub no_render: bool,

    #[arg(long, help = "Give up a search after this many expansions")]
    pub max_expansions: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub maps: Vec<String>,
    pub cases: usize,
    pub seed: u64,
    pub shuffle: bool,
    pub output_dir: String,
    pub results_path: Option<String>,
    pub render: bool,
    pub max_expansions: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            maps: Vec::new(),
            cases: 3,
            seed: 0,
            shuffle: false,
            output_dir: "result".to_string(),
            results_path: None,
            render: true,
            max_expansions: None,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Command-line values win over the config file.
    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if !cli.maps.is_empty() {
            self.maps = cli.maps.clone();
        }
        if let Some(cases) = cli.cases {
            self.cases = cases;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if cli.shuffle {
            self.shuffle = true;
        }
        if let Some(output_dir) = &cli.output_dir {
            self.output_dir = output_dir.clone();
        }
        if let Some(results_path) = &cli.results_path {
            self.results_path = Some(results_path.clone());
        }
        if cli.no_render {
            self.render = false;
        }
        if let Some(max_expansions) = cli.max_expansions {
            self.max_expansions = Some(max_expansions);
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.maps.is_empty() {
            return Err(anyhow!("No map given, use --map or the `maps` config key"));
        }
        if self.cases == 0 {
            return Err(anyhow!("Number of cases must be greater than 0"));
        }
        if self.max_expansions == Some(0) {
            return Err(anyhow!("Expansion limit must be greater than 0"));
        }
        Ok(())
    }

    pub fn scenario_path(map_path: &str) -> String {
        format!("{map_path}.scen")
    }
}
