//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod consumo_nao_compensado;
pub mod generator;
pub mod invoice_validation;
pub mod issued_invoice;
pub mod rateio;
pub mod rateio_item;
pub mod subscriber;

// Re-export specific types to avoid conflicts
pub use consumo_nao_compensado::{
    Column as ConsumoColumn, Entity as ConsumoNaoCompensado, Model as ConsumoModel,
};
pub use generator::{Column as GeneratorColumn, Entity as Generator, Model as GeneratorModel};
pub use invoice_validation::{
    Column as InvoiceValidationColumn, Entity as InvoiceValidation, Model as InvoiceValidationModel,
};
pub use issued_invoice::{
    Column as IssuedInvoiceColumn, Entity as IssuedInvoice, Model as IssuedInvoiceModel,
};
pub use rateio::{Column as RateioColumn, Entity as Rateio, Model as RateioModel};
pub use rateio_item::{Column as RateioItemColumn, Entity as RateioItem, Model as RateioItemModel};
pub use subscriber::{Column as SubscriberColumn, Entity as Subscriber, Model as SubscriberModel};
