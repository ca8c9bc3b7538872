pub mod component;
pub mod container;
pub mod entity;
pub mod error;
pub mod event;
pub mod query;
pub mod storage;
pub(crate) mod util;

pub use component::{Component, ComponentHandle};
pub use container::{Config, Container, Id as ContainerId};
pub use entity::{Entity, EntityMut, EntityRef};
pub use error::{Error, Result};
pub use event::{AfterCreate, AfterDestroy, BeforeCreate, Connection, Event};
pub use query::{Query, Row};

pub use rusty_ecs_macros::Component;
