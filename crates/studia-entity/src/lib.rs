pub mod certificate;
pub mod course;
pub mod enrollment;
pub mod feedback;
pub mod notification;
pub mod skill;
pub mod skill_record;
pub mod study_plan;
pub mod system_log;
pub mod teacher;
pub mod user;

pub use sea_orm;
