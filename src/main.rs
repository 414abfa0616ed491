use std::process;

use log::error;

mod app;
mod config;
mod errors;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod types;
mod utils;
mod validations;

use errors::AppError;

/// Process exit status for failures that stop the site from booting
fn exit_code(err: &AppError) -> Option<i32> {
    match err {
        AppError::Server(_) => Some(1),
        AppError::Config(_) => Some(2),
        AppError::Logger(_) => Some(3),
        _ => None,
    }
}

#[actix_web::main]
async fn main() {
    let Err(err) = app::server().await else {
        return;
    };

    match exit_code(&err) {
        Some(code) => {
            // Bind failures, bad env values and a second logger init land here
            error!("Blue Bunny site failed to start: {}", err);
            process::exit(code);
        }
        None => error!("Blue Bunny site stopped: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Error as IoError, ErrorKind};

    use super::*;

    #[test]
    fn test_startup_failures_map_to_distinct_exit_codes() {
        let bind = AppError::Server(IoError::new(ErrorKind::AddrInUse, "port taken"));
        assert_eq!(exit_code(&bind), Some(1));
        assert_eq!(exit_code(&AppError::Config("bad SERVER_PORT".to_string())), Some(2));
        assert_eq!(exit_code(&AppError::Logger("already set".to_string())), Some(3));
        assert_eq!(exit_code(&AppError::Internal("late".to_string())), None);
    }
}
