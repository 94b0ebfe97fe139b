pub mod incident;
pub mod loader;
pub mod aggregate;
pub mod palette;
pub mod charts;
pub mod dashboard;
pub mod server;

pub use incident::{Incident, RaceEthnicity, RecordError, YearMonth};
pub use loader::{
    parse_incidents, DatasetLoader, DatasetSource, LoadError, LoadReport, LoaderConfig,
    SkippedRecord,
};
pub use aggregate::{
    Aggregates, MonthlyRow, NeighborhoodRow, RaceRow, Selection, SummaryTable, TimeOfDayRow,
};
pub use palette::{Palette, PaletteError};
pub use charts::{ChartKind, Figure, Trace};
pub use dashboard::{Dashboard, Figures, SharedDashboard, DEFAULT_SELECTION};
pub use server::{run_server, ApiError, AppState, ServerConfig};
