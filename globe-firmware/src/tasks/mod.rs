// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Tasks kommunizieren über den geteilten Link-Zustand (HTTP → Controller)
// und den Status-PubSub (Controller → HTTP).

pub mod controller;
pub mod http;
pub mod mdns;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use controller::{controller_logic, controller_task};
pub use http::http_server_task;
pub use mdns::mdns_responder_task;
pub use wifi::{connection_task, dhcp_task, net_task};
