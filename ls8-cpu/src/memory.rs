use thiserror::Error;

/// The LS-8 has an 8-bit address bus, so this is all the memory there is.
pub const RAM_SIZE: usize = 256;

/// Something the CPU can read bytes from and write bytes into. Every `u8`
/// is a valid address.
pub trait Memory {
    fn read_byte(&mut self, address: u8) -> u8;
    fn write_byte(&mut self, address: u8, data: u8);
}

#[derive(Debug, Error)]
#[error("program image is {len} bytes, but memory only holds {RAM_SIZE}")]
pub struct ImageTooLarge {
    pub len: usize,
}

/// Plain, flat, zero-initialized RAM. Holds the program, its data, and the
/// stack.
#[derive(Debug)]
pub struct Ram {
    cells: [u8; RAM_SIZE],
}

impl Ram {
    pub fn new() -> Ram {
        Ram {
            cells: [0u8; RAM_SIZE],
        }
    }

    /// Copy a program image into memory, starting at address 0.
    pub fn load(&mut self, image: &[u8]) -> Result<(), ImageTooLarge> {
        if image.len() > RAM_SIZE {
            return Err(ImageTooLarge { len: image.len() });
        }
        self.cells[..image.len()].copy_from_slice(image);
        Ok(())
    }

    pub fn with_image(image: &[u8]) -> Result<Ram, ImageTooLarge> {
        let mut ram = Ram::new();
        ram.load(image)?;
        Ok(ram)
    }
}

impl Default for Ram {
    fn default() -> Self {
        Ram::new()
    }
}

impl Memory for Ram {
    fn read_byte(&mut self, address: u8) -> u8 {
        self.cells[address as usize]
    }
    fn write_byte(&mut self, address: u8, data: u8) {
        self.cells[address as usize] = data;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_places_image_at_zero() {
        let mut ram = Ram::with_image(&[0x82, 0x00, 0x08]).unwrap();
        assert_eq!(ram.read_byte(0), 0x82);
        assert_eq!(ram.read_byte(1), 0x00);
        assert_eq!(ram.read_byte(2), 0x08);
        assert_eq!(ram.read_byte(3), 0x00);
    }

    #[test]
    fn whole_address_space_is_usable() {
        let mut ram = Ram::new();
        ram.write_byte(0xFF, 0xAB);
        assert_eq!(ram.read_byte(0xFF), 0xAB);
    }

    #[test]
    fn full_size_image_fits() {
        assert!(Ram::with_image(&[1u8; RAM_SIZE]).is_ok());
    }

    #[test]
    fn oversized_image_is_rejected() {
        let error = Ram::with_image(&[0u8; RAM_SIZE + 1]).unwrap_err();
        assert_eq!(error.len, RAM_SIZE + 1);
    }
}
