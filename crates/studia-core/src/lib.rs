pub mod actor;
pub mod audit;
pub mod certificate;
pub mod error;
pub mod feedback;
pub mod identity;
pub mod ledger;
pub mod notification;
pub mod plan;
pub mod skill;
