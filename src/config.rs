use std::path::PathBuf;

use serde::Deserialize;

use crate::tool::ToolProfile;

#[derive(Debug, Deserialize)]
pub struct JobConfig {
    /// SVG file with the outline to simulate.
    pub input: PathBuf,
    /// Bit radius, in the units of the input file.
    pub radius: f64,
    /// Simulation tolerance. Defaults to a hundredth of the radius.
    pub tolerance: Option<f64>,
    /// Smallest unreachable region worth reporting.
    pub min_detail_area: Option<f64>,
}

impl JobConfig {
    pub fn tool(&self) -> ToolProfile {
        let mut tool = match self.tolerance {
            Some(tolerance) => ToolProfile::with_tolerance(self.radius, tolerance),
            None => ToolProfile::new(self.radius),
        };
        tool.min_detail_area = self.min_detail_area;
        tool
    }
}

#[derive(Debug, Deserialize)]
pub struct SimConfig {
    pub name: String,
    pub outdir: PathBuf,
    pub jobs: Vec<JobConfig>,
}
