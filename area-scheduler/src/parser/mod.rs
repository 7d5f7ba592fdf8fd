pub mod cells;
pub mod columns;
pub mod capacity;
pub mod jobs;
pub mod roster;

pub use cells::{clean_number, decode_text};
pub use capacity::{build_capacity_matrix, load_capacity_table, parse_capacity_bytes, read_rows, AreaCatalog, CapacityTable};
pub use jobs::{load_jobs, read_jobs};
pub use roster::{load_schedule, load_seat_demand, load_workers, read_schedule, read_seat_demand, read_workers};
