use fnv::{FnvHashMap, FnvHashSet};
use std::path::Path;

pub mod data;
pub mod plan;

pub type Map<K, V> = FnvHashMap<K, V>;
pub type Set<T> = FnvHashSet<T>;

mod logging_setup {
  use super::*;
  use std::fs::OpenOptions;
  use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
  use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

  fn build_and_set_global_subscriber<P>(logfile: Option<P>, is_test: bool) -> Option<WorkerGuard>
  where
    P: AsRef<Path>,
  {
    let stderr_log = fmt::layer();
    let env_filter = EnvFilter::from_default_env();
    let r = registry().with(stderr_log).with(env_filter);

    match logfile {
      Some(p) => {
        let logfile = OpenOptions::new()
          .create(true)
          .write(true)
          .truncate(true)
          .open(p)
          .unwrap();
        let (writer, guard) = non_blocking::NonBlockingBuilder::default()
          .lossy(false)
          .finish(logfile);
        let json_log = fmt::layer()
          .json()
          .with_span_list(true)
          .with_current_span(false)
          .with_writer(writer);

        let r = r.with(json_log);
        if is_test {
          r.try_init().ok();
        } else {
          r.init();
        }
        Some(guard)
      }
      None => {
        if is_test {
          r.try_init().ok();
        } else {
          r.init();
        }
        None
      }
    }
  }

  pub fn init_logging(logfile: Option<impl AsRef<Path>>) -> Option<WorkerGuard> {
    return build_and_set_global_subscriber(logfile, false);
  }

  #[allow(dead_code)]
  pub(crate) fn init_test_logging(logfile: Option<impl AsRef<Path>>) -> Option<WorkerGuard> {
    return build_and_set_global_subscriber(logfile, true);
  }
}
pub use logging_setup::*;
