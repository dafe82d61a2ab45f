use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

const STUDIO_JSON: &str = include_str!("../data/studio.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentCategory {
    pub id: String,
    pub name: String,
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fabric {
    pub id: String,
    pub name: String,
    pub price_per_yard: u32,
    pub sustainable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturingTier {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioCatalog {
    pub categories: Vec<GarmentCategory>,
    pub fabrics: Vec<Fabric>,
    pub colors: Vec<String>,
    pub manufacturing: Vec<ManufacturingTier>,
}

impl StudioCatalog {
    pub fn load() -> Result<Self> {
        serde_json::from_str(STUDIO_JSON).context("failed to parse design studio catalog")
    }

    fn category(&self, id: &str) -> Option<&GarmentCategory> {
        self.categories.iter().find(|x| x.id == id)
    }
}

#[derive(Debug, Clone)]
pub enum StudioAction {
    SelectCategory(String),
    SelectSubcategory(String),
    SelectFabric(String),
    SelectColor(String),
    SelectManufacturing(String),
    ToggleSizeGuide,
    ToggleSustainableOnly,
}

/// Selections on the design studio screen. Every selected id refers to an
/// entry of the catalog, and the subcategory always belongs to the selected
/// category.
#[derive(Debug, Clone)]
pub struct DesignStudio {
    catalog: StudioCatalog,
    category: String,
    subcategory: String,
    fabric: String,
    color: String,
    manufacturing: String,
    show_size_guide: bool,
    sustainable_only: bool,
}

impl DesignStudio {
    pub fn new(catalog: StudioCatalog) -> Result<Self> {
        let mut studio = Self {
            catalog,
            category: String::new(),
            subcategory: String::new(),
            fabric: String::new(),
            color: String::new(),
            manufacturing: String::new(),
            show_size_guide: false,
            sustainable_only: false,
        };
        studio.apply(StudioAction::SelectCategory("womens".to_string()))?;
        studio.apply(StudioAction::SelectSubcategory("dresses".to_string()))?;
        studio.apply(StudioAction::SelectFabric("cotton".to_string()))?;
        studio.apply(StudioAction::SelectColor("#8B5CF6".to_string()))?;
        studio.apply(StudioAction::SelectManufacturing("small".to_string()))?;
        Ok(studio)
    }

    pub fn load() -> Result<Self> {
        Self::new(StudioCatalog::load()?)
    }

    pub fn apply(&mut self, action: StudioAction) -> Result<()> {
        match action {
            StudioAction::SelectCategory(id) => {
                let category = match self.catalog.category(&id) {
                    Some(category) => category,
                    None => bail!("unknown garment category '{id}'"),
                };
                let first = category
                    .subcategories
                    .first()
                    .with_context(|| format!("garment category '{id}' has no subcategories"))?;
                self.subcategory = first.id.clone();
                self.category = id;
            }
            StudioAction::SelectSubcategory(id) => {
                let category = self
                    .catalog
                    .category(&self.category)
                    .context("no garment category selected")?;
                if !category.subcategories.iter().any(|x| x.id == id) {
                    bail!("'{id}' is not a subcategory of '{}'", category.id);
                }
                self.subcategory = id;
            }
            StudioAction::SelectFabric(id) => {
                if !self.catalog.fabrics.iter().any(|x| x.id == id) {
                    bail!("unknown fabric '{id}'");
                }
                self.fabric = id;
            }
            StudioAction::SelectColor(hex) => {
                match self
                    .catalog
                    .colors
                    .iter()
                    .find(|x| x.eq_ignore_ascii_case(&hex))
                {
                    Some(color) => self.color = color.clone(),
                    None => bail!("color '{hex}' is not in the palette"),
                }
            }
            StudioAction::SelectManufacturing(id) => {
                if !self.catalog.manufacturing.iter().any(|x| x.id == id) {
                    bail!("unknown manufacturing option '{id}'");
                }
                self.manufacturing = id;
            }
            StudioAction::ToggleSizeGuide => self.show_size_guide = !self.show_size_guide,
            StudioAction::ToggleSustainableOnly => self.sustainable_only = !self.sustainable_only,
        }
        debug!(
            "Studio selection: {}/{} fabric = {} color = {} tier = {}",
            self.category, self.subcategory, self.fabric, self.color, self.manufacturing
        );
        Ok(())
    }

    /// Fabric choices currently offered; the selected fabric stays selected
    /// even when the sustainable filter hides it.
    pub fn visible_fabrics(&self) -> impl Iterator<Item = &Fabric> + '_ {
        self.catalog
            .fabrics
            .iter()
            .filter(|x| !self.sustainable_only || x.sustainable)
    }

    pub fn ai_suggestion(&self) -> String {
        let category = self
            .catalog
            .category(&self.category)
            .map(|x| x.name.to_lowercase())
            .unwrap_or_default();
        format!("AI suggests: Sustainable fabrics are trending for {category} wear!")
    }

    pub fn catalog(&self) -> &StudioCatalog {
        &self.catalog
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    pub fn fabric(&self) -> &str {
        &self.fabric
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn manufacturing(&self) -> &str {
        &self.manufacturing
    }

    pub fn show_size_guide(&self) -> bool {
        self.show_size_guide
    }

    pub fn sustainable_only(&self) -> bool {
        self.sustainable_only
    }
}
