use specimen_generate::LeafRegistry;

fn main() {
    let registry = LeafRegistry::new();
    for id in registry.generator_ids() {
        println!("{id}");
    }
}
