pub mod books;
pub mod todos;

use taskshelf_db::Client;
use taskshelf_kernel::ModuleRegistry;

/// Register all resource modules with the registry, injecting the shared
/// store handle at composition time.
pub fn register_all(registry: &mut ModuleRegistry, db: &Client) {
    registry.register(todos::create_module(db.clone()));
    registry.register(books::create_module(db.clone()));
}
