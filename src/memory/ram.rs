//! Flat word-addressed memory

use crate::error::LoadError;
use crate::error::SimulatorResult;

/// Number of 13-bit addressable memory cells
pub const MEM_SIZE: usize = 1 << 13;

/// Main memory: 8192 cells of 16 bits each.
/// Every address is reduced modulo `MEM_SIZE`
pub struct Ram {
    data: Box<[u16; MEM_SIZE]>,
}

impl Default for Ram {
    fn default() -> Self {
        Self::make()
    }
}

impl Ram {
    /// Make a zero-filled memory
    pub fn make() -> Self {
        Self { data: Box::new([0; MEM_SIZE]) }
    }

    /// Make a memory holding the given image at addresses 0..N
    pub fn from_image(image: &[u16]) -> SimulatorResult<Self> {
        let mut ram = Self::make();
        ram.load_image(image)?;
        Ok(ram)
    }

    /// Copy a program image to the bottom of memory
    pub fn load_image(&mut self, image: &[u16]) -> SimulatorResult<()> {
        if image.len() > MEM_SIZE {
            return Err(LoadError::ProgramTooBig(image.len() - 1).into());
        }
        self.data[..image.len()].copy_from_slice(image);
        Ok(())
    }

    /// Reduce an address to a valid cell index
    pub fn wrap(address: u16) -> u16 {
        address % MEM_SIZE as u16
    }

    pub fn get(&self, address: u16) -> u16 {
        self.data[Self::wrap(address) as usize]
    }

    pub fn set(&mut self, address: u16, value: u16) {
        self.data[Self::wrap(address) as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_wrap() {
        let mut ram = Ram::make();
        ram.set(8192 + 5, 42);
        assert_eq!(ram.get(5), 42);
        assert_eq!(ram.get(5 + 3 * 8192), 42);
    }

    #[test]
    fn test_load_image() {
        let ram = Ram::from_image(&[1, 2, 3]).unwrap();
        assert_eq!(ram.get(0), 1);
        assert_eq!(ram.get(2), 3);
        assert_eq!(ram.get(3), 0);
    }

    #[test]
    fn test_image_too_big() {
        let image = vec![0u16; MEM_SIZE + 1];
        assert!(Ram::from_image(&image).is_err());
        let image = vec![7u16; MEM_SIZE];
        assert_eq!(Ram::from_image(&image).unwrap().get(8191), 7);
    }
}
