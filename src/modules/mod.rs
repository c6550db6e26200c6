// Module exports for pure logic
pub mod context_menu;        // Close variants offered on right click
pub mod hidden_tabs;         // Overflow menu of tabs scrolled out of view
pub mod navigation;          // Paths, targets and the Router seam
pub mod route_cache;         // View retention strategy
pub mod router;              // In-memory routing facility
pub mod signal;              // Observable state container
pub mod tabs;                // Tab registry
