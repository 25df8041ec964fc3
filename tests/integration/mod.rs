//! Integration tests driving the pkg-release binary against real git repositories

mod helpers;
mod test_plan;
mod test_publish;
mod test_release;
