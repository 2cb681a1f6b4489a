pub mod backup_config;
pub mod folder_sync;
pub mod logging;
pub mod process;
pub mod remote;
pub mod result_error;
pub mod session;
pub mod snapshot;
#[cfg(test)]
pub(crate) mod testing;
pub mod validate;

macro_rules! function_path {
    () => {
        concat!(module_path!(), "::", function_name!(), " ", file!(), ":", line!())
    };
}

pub(crate) use function_path;
