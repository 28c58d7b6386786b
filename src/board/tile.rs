/// Entities standing on one board location, in arrival order
///
/// Duplicates are not rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile<T> {
    occupants: Vec<T>,
}

impl<T> Default for Tile<T> {
    fn default() -> Self {
        Self {
            occupants: Vec::new(),
        }
    }
}

impl<T: PartialEq> Tile<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an occupant behind everyone already here
    pub fn put(&mut self, occupant: T) {
        self.occupants.push(occupant);
    }

    /// Remove the first matching occupant, returning whether one was found
    pub fn remove(&mut self, occupant: &T) -> bool {
        match self.occupants.iter().position(|o| o == occupant) {
            Some(i) => {
                self.occupants.remove(i);
                true
            }
            None => false,
        }
    }

    /// Current occupants, first arrival first
    pub fn occupants(&self) -> &[T] {
        &self.occupants
    }

    pub fn contains(&self, occupant: &T) -> bool {
        self.occupants.contains(occupant)
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }
}
