pub mod allgovtjobs;
pub mod careerpower;
pub mod sarkariresult;

pub use allgovtjobs::AllGovtJobsScraper;
pub use careerpower::CareerPowerScraper;
pub use sarkariresult::SarkariResultScraper;
