pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub mod crypto {
    pub mod signing;
    pub mod token;
}

pub mod models {
    pub mod content;
    pub mod session;
}

pub mod repositories {
    pub mod data_file;
}

pub mod session {
    pub mod codec;
    pub mod mutator;
    pub mod validator;
}

pub mod handlers {
    pub mod admin;
    pub mod content;
}

pub mod middleware_layer {
    pub mod activity;
    pub mod auth;
}

pub mod validation {
    pub mod identity;
}

pub use config::Config;
pub use routes::build_router;
pub use state::AppState;
