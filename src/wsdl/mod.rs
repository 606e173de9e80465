//! Message/operation graph
//!
//! Messages, port-types, bindings and services. Components reference each
//! other by symbolic name, never by object identity, so construction order
//! is free to diverge from dependency order.

pub mod bindings;
pub mod messages;
pub mod port_types;
pub mod services;

pub use bindings::{
    Binding, BindingOperation, BindingProtocol, HttpOperationBinding, HttpSerialization, HttpVerb,
    OperationDetail, SoapOperationBinding, SoapStyle, SoapUse,
};
pub use messages::{Message, PartRef};
pub use port_types::{ExchangePattern, FaultRef, Operation, PortType};
pub use services::{Port, Service};
