/// Business process runtime
pub mod business_process;

/// Registry of running processes
pub mod registry;
