// Crate entry point. Re-export modules so tests and binaries can import them easily.
//
// Responsibilities
// - Only declare and expose modules. No business logic here.
//
// How it is used
// - Screens create one OptimisticCollection per scope and drive it with remote operations
//   and the realtime feed.

pub mod config;

pub mod core {
    pub mod identity;
    pub mod ports;
    pub mod purchase_order;
    pub mod state;
}

pub mod application {
    pub mod errors;
    pub mod keyed_locks;
    pub mod optimistic_collection;
    pub mod options;
    pub mod realtime {
        pub mod event;
        pub mod runner;
    }
}

pub mod adapters {
    pub mod in_memory {
        pub mod in_memory_notifier;
        pub mod in_memory_remote;
    }
    pub mod tracing_notifier;
}
