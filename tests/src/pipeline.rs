mod analytics_test;
mod registry_test;
mod service_test;
mod util;
