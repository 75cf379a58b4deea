use indexmap::IndexMap;

/// Symbol table built during pass 1, frozen before pass 2. Keys are
/// case-sensitive label names; entries keep the defining line for
/// redefinition diagnostics and insertion order for listings.
pub struct Symbols(IndexMap<String, (usize, u32)>);

impl Symbols {
    pub fn new() -> Self {
        Symbols(IndexMap::new())
    }

    /// Bind a label. Returns the previous (line, addr) entry if the name was
    /// already defined; the new binding wins.
    pub fn insert(&mut self, name: String, line: usize, addr: u32) -> Option<(usize, u32)> {
        self.0.insert(name, (line, addr))
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.0.get(name).map(|(_, addr)| *addr)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, (_, addr))| (name.as_str(), *addr))
    }
}
