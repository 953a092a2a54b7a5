pub mod league;
pub mod server;

pub use league::LeagueService;
pub use server::ServerService;
