mod enums;
pub use self::enums::{Level, NetworkContext};

mod request;
pub use self::request::{CostEstimateRequest, OneOrMany, ProviderData};

mod response;
pub use self::response::CostEstimateResponse;
