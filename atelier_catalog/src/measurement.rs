use std::{str::FromStr, time::Duration};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeasurementMethod {
    Manual,
    #[default]
    Ai,
    Photo,
}

impl FromStr for MeasurementMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "ai" => Ok(Self::Ai),
            "photo" => Ok(Self::Photo),
            _ => bail!("unknown measurement method '{s}' (expected manual, ai or photo)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub id: &'static str,
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
    pub required: bool,
}

// (id, label, required, scan result)
const DEFAULT_MEASUREMENTS: [(&str, &str, bool, &str); 7] = [
    ("chest", "Chest/Bust", true, "36"),
    ("waist", "Waist", true, "28"),
    ("hips", "Hips", true, "38"),
    ("shoulders", "Shoulder Width", true, "16"),
    ("sleeve", "Sleeve Length", false, "24"),
    ("inseam", "Inseam", false, "30"),
    ("neck", "Neck", false, "14"),
];

#[derive(Debug, Clone, Serialize)]
pub struct MeasurementSheet {
    method: MeasurementMethod,
    measurements: Vec<Measurement>,
    analyzing: bool,
}

impl Default for MeasurementSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementSheet {
    pub fn new() -> Self {
        let measurements = DEFAULT_MEASUREMENTS
            .into_iter()
            .map(|(id, label, required, _)| Measurement {
                id,
                label,
                value: String::new(),
                unit: "inches",
                required,
            })
            .collect();

        Self {
            method: MeasurementMethod::default(),
            measurements,
            analyzing: false,
        }
    }

    pub fn set_method(&mut self, method: MeasurementMethod) {
        self.method = method;
    }

    pub fn method(&self) -> MeasurementMethod {
        self.method
    }

    pub fn update(&mut self, id: &str, value: impl Into<String>) -> Result<()> {
        match self.measurements.iter_mut().find(|x| x.id == id) {
            Some(measurement) => {
                measurement.value = value.into();
                Ok(())
            }
            None => bail!("unknown measurement '{id}'"),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Measurement> {
        self.measurements.iter().find(|x| x.id == id)
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn missing_required(&self) -> impl Iterator<Item = &Measurement> + '_ {
        self.measurements
            .iter()
            .filter(|x| x.required && x.value.trim().is_empty())
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().next().is_none()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    /// Overwrites every entry with the fixed scan result.
    pub fn apply_body_scan(&mut self) {
        for measurement in self.measurements.iter_mut() {
            if let Some((_, _, _, value)) = DEFAULT_MEASUREMENTS
                .iter()
                .find(|(id, ..)| *id == measurement.id)
            {
                measurement.value = value.to_string();
            }
        }
    }

    pub async fn run_body_scan(&mut self, delay: Duration) {
        info!("Analyzing body scan...");
        self.analyzing = true;
        tokio::time::sleep(delay).await;
        self.apply_body_scan();
        self.analyzing = false;
        info!("Body scan complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_start_incomplete() {
        let sheet = MeasurementSheet::new();

        assert_eq!(7, sheet.measurements().len());
        assert_eq!(MeasurementMethod::Ai, sheet.method());
        assert!(!sheet.is_complete());
        assert_eq!(
            vec!["chest", "waist", "hips", "shoulders"],
            sheet.missing_required().map(|x| x.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn can_complete_with_required_only() {
        let mut sheet = MeasurementSheet::new();
        sheet.update("chest", "35").unwrap();
        sheet.update("waist", "27").unwrap();
        sheet.update("hips", "37").unwrap();
        assert!(!sheet.is_complete());

        sheet.update("shoulders", "  ").unwrap();
        assert!(!sheet.is_complete());

        sheet.update("shoulders", "15.5").unwrap();
        assert!(sheet.is_complete());
        assert_eq!("", sheet.get("neck").unwrap().value);
    }

    #[test]
    fn can_reject_unknown_measurement() {
        let mut sheet = MeasurementSheet::new();
        assert!(sheet.update("wingspan", "70").is_err());
    }

    #[test]
    fn can_apply_body_scan() {
        let mut sheet = MeasurementSheet::new();
        sheet.update("chest", "40").unwrap();
        sheet.apply_body_scan();

        let values: Vec<_> = sheet.measurements().iter().map(|x| x.value.as_str()).collect();
        assert_eq!(vec!["36", "28", "38", "16", "24", "30", "14"], values);
        assert!(sheet.is_complete());
    }

    #[test]
    fn can_parse_method() {
        assert_eq!(MeasurementMethod::Photo, "Photo".parse().unwrap());
        assert!("laser".parse::<MeasurementMethod>().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn can_run_body_scan_after_delay() {
        let mut sheet = MeasurementSheet::new();
        sheet.run_body_scan(Duration::from_secs(3)).await;

        assert!(!sheet.is_analyzing());
        assert!(sheet.is_complete());
        assert_eq!("14", sheet.get("neck").unwrap().value);
    }
}
