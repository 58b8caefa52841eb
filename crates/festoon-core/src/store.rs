use crate::particle::Particle;

/// Unordered particle collection. Creation order is kept but nothing depends on it.
#[derive(Debug, Default, Clone)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn extend<I: IntoIterator<Item = Particle>>(&mut self, particles: I) {
        self.particles.extend(particles);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    /// Drops every particle whose life is spent and returns how many went.
    pub fn prune_expired(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(|particle| !particle.is_expired());
        before - self.particles.len()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
