//! Platform names and the catalogs that back them

use std::fmt;

/// Upstream source family a catalog is fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogFamily {
    /// Mojang version manifest (game releases)
    Minecraft,
    /// PaperMC project API (proxy projects such as velocity, waterfall)
    PaperMc,
}

impl CatalogFamily {
    /// Returns the string representation of the catalog family
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogFamily::Minecraft => "minecraft",
            CatalogFamily::PaperMc => "papermc",
        }
    }
}

impl std::str::FromStr for CatalogFamily {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minecraft" => Ok(CatalogFamily::Minecraft),
            "papermc" => Ok(CatalogFamily::PaperMc),
            _ => Err(()),
        }
    }
}

/// Cache key of one catalog: the family plus the case-folded project name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogKey {
    pub family: CatalogFamily,
    pub name: String,
}

impl CatalogKey {
    pub fn new(family: CatalogFamily, name: &str) -> Self {
        Self {
            family,
            name: name.to_lowercase(),
        }
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family.as_str(), self.name)
    }
}

/// Game server platform resolved against the Minecraft release catalog
pub const PAPER: &str = "PAPER";
/// Proxy platforms resolved against their own PaperMC project catalog
pub const VELOCITY: &str = "VELOCITY";
pub const WATERFALL: &str = "WATERFALL";

/// Select the catalog backing a platform, `None` for platforms without one
pub fn catalog_key_for(platform: &str) -> Option<CatalogKey> {
    match platform {
        PAPER => Some(CatalogKey::new(CatalogFamily::Minecraft, "minecraft")),
        VELOCITY | WATERFALL => Some(CatalogKey::new(CatalogFamily::PaperMc, platform)),
        _ => None,
    }
}
