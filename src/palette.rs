use std::collections::HashMap;
use std::fmt;

/// Colour used for a neighborhood with no palette entry.
pub const FALLBACK_COLOR: &str = "#7f7f7f";

/// Fixed colour per DC neighborhood cluster, shared by all three charts.
pub const NEIGHBORHOOD_COLORS: &[(&str, &str)] = &[
    ("Brightwood Park, Crestwood, Petworth", "#592f7c"),
    ("Brookland, Brentwood, Langdon", "#c1a506"),
    ("Capitol Hill, Lincoln Park", "#ac5503"),
    ("Capitol View, Marshall Heights, Benning Heights", "#8c2b0d"),
    ("Cathedral Heights, McLean Gardens, Glover Park", "#68a59f"),
    (
        "Cleveland Park, Woodley Park, Massachusetts Avenue Heights, Woodland-Normanstone Terrace",
        "#125ca5",
    ),
    ("Colonial Village, Shepherd Park, North Portal Estates", "#b9f43b"),
    ("Columbia Heights, Mt. Pleasant, Pleasant Plains, Park View", "#6596e7"),
    ("Congress Heights, Bellevue, Washington Highlands", "#d1aaad"),
    ("Deanwood, Burrville, Grant Park, Lincoln Heights, Fairmont Heights", "#b38640"),
    ("Douglas, Shipley Terrace", "#cda1e5"),
    (
        "Downtown, Chinatown, Penn Quarters, Mount Vernon Square, North Capitol Street",
        "#dfbf1e",
    ),
    ("Dupont Circle, Connecticut Avenue/K Street", "#484d36"),
    ("Eastland Gardens, Kenilworth", "#c89a5c"),
    ("Edgewood, Bloomingdale, Truxton Circle, Eckington", "#f733a9"),
    ("Fairfax Village, Naylor Gardens, Hillcrest, Summit Park", "#d7d645"),
    ("Friendship Heights, American University Park, Tenleytown", "#c38239"),
    ("Georgetown, Burleith/Hillandale", "#be73db"),
    ("Hawthorne, Barnaby Woods, Chevy Chase", "#32dcf4"),
    ("Historic Anacostia", "#7b3f99"),
    ("Howard University, Le Droit Park, Cardozo/Shaw", "#129b58"),
    ("Ivy City, Arboretum, Trinidad, Carver Langston", "#ec9582"),
    ("Kalorama Heights, Adams Morgan, Lanier Heights", "#ffc6d0"),
    ("Lamont Riggs, Queens Chapel, Fort Totten, Pleasant Hill", "#dbadd9"),
    ("Mayfair, Hillbrook, Mahaning Heights", "#e13074"),
    ("Near Southeast, Navy Yard", "#acfb9e"),
    ("North Cleveland Park, Forest Hills, Van Ness", "#ca74f7"),
    ("North Michigan Park, Michigan Park, University Heights", "#00f4e9"),
    ("River Terrace, Benning, Greenway, Dupont Park", "#309ea2"),
    ("Shaw, Logan Circle", "#0695bd"),
    ("Sheridan, Barry Farm, Buena Vista", "#b206d2"),
    (
        "Southwest Employment Area, Southwest/Waterfront, Fort McNair, Buzzard Point",
        "#dc65ae",
    ),
    (
        "Spring Valley, Palisades, Wesley Heights, Foxhall Crescent, Foxhall Village, Georgetown Reservoir",
        "#b908e2",
    ),
    ("Takoma, Brightwood, Manor Park", "#474d0f"),
    (
        "Twining, Fairlawn, Randle Highlands, Penn Branch, Fort Davis Park, Fort Dupont",
        "#6ab814",
    ),
    ("Union Station, Stanton Park, Kingman Park", "#fed208"),
    ("West End, Foggy Bottom, GWU", "#2130ca"),
    ("Woodland/Fort Stanton, Garfield Heights, Knox Hill", "#8f9761"),
    ("Woodridge, Fort Lincoln, Gateway", "#c95bd5"),
];

/// Neighborhood → display colour lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: HashMap<String, String>,
    fallback: String,
}

impl Palette {
    /// Builds a palette from explicit entries with the default fallback.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Palette {
            colors: entries
                .into_iter()
                .map(|(name, color)| (name.into(), color.into()))
                .collect(),
            fallback: FALLBACK_COLOR.to_string(),
        }
    }

    /// Strict lookup.
    ///
    /// # Errors
    /// Returns `PaletteError::Unmapped` when `neighborhood` has no entry.
    pub fn lookup(&self, neighborhood: &str) -> Result<&str, PaletteError> {
        self.colors
            .get(neighborhood)
            .map(String::as_str)
            .ok_or_else(|| PaletteError::Unmapped(neighborhood.to_string()))
    }

    /// Colour to draw `neighborhood` with, falling back to a neutral grey
    /// when it has no entry.
    ///
    /// Silent on a miss; unmapped dataset names are reported once per
    /// snapshot through `missing_from`.
    pub fn color_for(&self, neighborhood: &str) -> &str {
        self.lookup(neighborhood).unwrap_or(self.fallback.as_str())
    }

    /// Names from `neighborhoods` that have no palette entry, in input order.
    pub fn missing_from<'a, I>(&self, neighborhoods: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        neighborhoods
            .into_iter()
            .filter(|name| !self.colors.contains_key(*name))
            .collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::new(NEIGHBORHOOD_COLORS.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// Neighborhood has no palette entry
    Unmapped(String),
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::Unmapped(name) => write!(f, "No colour for neighborhood '{}'", name),
        }
    }
}

impl std::error::Error for PaletteError {}
