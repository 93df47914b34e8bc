//! Builders for little-endian map records

#![allow(dead_code)]

fn put_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_f64(buf: &mut Vec<u8>, v: f64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_string(buf: &mut Vec<u8>, s: &str) {
    put_u32(buf, s.len() as u32);
    buf.extend_from_slice(s.as_bytes());
}

/// One axis record
#[derive(Debug, Clone)]
pub struct AxisRecord {
    pub description: String,
    pub units: String,
    pub factor: f64,
    pub offset: f64,
    pub data_source: i32,
    pub address: u32,
    pub encoding: i32,
    pub reciprocal: bool,
    pub precision: u8,
    pub signed: bool,
    pub block: Vec<i32>,
    pub signature: u32,
}

impl Default for AxisRecord {
    fn default() -> Self {
        Self {
            description: String::new(),
            units: String::new(),
            factor: 1.0,
            offset: 0.0,
            data_source: 0,
            address: 0,
            encoding: 1,
            reciprocal: false,
            precision: 0,
            signed: false,
            block: Vec::new(),
            signature: u32::MAX,
        }
    }
}

impl AxisRecord {
    /// Memory-backed axis
    pub fn memory(units: &str, address: u32, encoding: i32) -> Self {
        Self {
            units: units.to_string(),
            data_source: 1,
            address,
            encoding,
            ..Self::default()
        }
    }

    /// Index-labelled axis
    pub fn ordinal(units: &str) -> Self {
        Self {
            units: units.to_string(),
            data_source: 0,
            address: 0xDEAD,
            ..Self::default()
        }
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        put_string(buf, &self.description);
        put_string(buf, &self.units);
        put_f64(buf, self.factor);
        put_f64(buf, self.offset);
        put_i32(buf, self.data_source);
        put_u32(buf, self.address);
        put_i32(buf, self.encoding);
        buf.extend_from_slice(&[0u8; 8]);
        buf.push(0);
        buf.push(u8::from(self.reciprocal));
        buf.push(self.precision);
        buf.extend_from_slice(&[0u8; 3]);
        buf.push(u8::from(self.signed));
        put_i32(buf, (self.block.len() * 4) as i32);
        for word in &self.block {
            put_i32(buf, *word);
        }
        put_i32(buf, 0);
        put_u32(buf, self.signature);
    }
}

/// One map record
#[derive(Debug, Clone)]
pub struct MapRecord {
    pub name: String,
    pub id: String,
    pub organization: i32,
    pub encoding: i32,
    pub folder_id: i32,
    pub range: [i32; 4],
    pub reciprocal: bool,
    pub signed: bool,
    pub difference: bool,
    pub percent: bool,
    pub size: (i32, i32),
    pub precision: i32,
    pub description: String,
    pub units: String,
    pub factor: f64,
    pub offset: f64,
    pub extent: [u32; 2],
    pub x_axis: AxisRecord,
    pub y_axis: AxisRecord,
}

impl Default for MapRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            id: String::new(),
            organization: 2,
            encoding: 1,
            folder_id: 0,
            range: [0; 4],
            reciprocal: false,
            signed: false,
            difference: false,
            percent: false,
            size: (1, 1),
            precision: 2,
            description: String::new(),
            units: String::new(),
            factor: 1.0,
            offset: 0.0,
            extent: [0, 0],
            x_axis: AxisRecord::default(),
            y_axis: AxisRecord::default(),
        }
    }
}

impl MapRecord {
    /// Scalar constant at `address`
    pub fn constant(name: &str, id: &str, address: u32) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            extent: [address, address],
            ..Self::default()
        }
    }

    /// 2-D table with memory-backed axes
    pub fn table(name: &str, id: &str, cols: i32, rows: i32) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            organization: 4,
            size: (cols, rows),
            extent: [0x1000, 0x1000],
            x_axis: AxisRecord::memory("rpm", 0x200, 2),
            y_axis: AxisRecord::memory("kPa", 0x300, 1),
            ..Self::default()
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(0);
        put_string(&mut buf, &self.name);
        put_i32(&mut buf, self.organization);
        put_i32(&mut buf, 0);
        put_i32(&mut buf, self.encoding);
        put_i32(&mut buf, 0);
        put_i32(&mut buf, 0);
        put_i32(&mut buf, self.folder_id);
        put_string(&mut buf, &self.id);
        put_i32(&mut buf, 0);
        buf.push(0);
        for v in self.range {
            put_i32(&mut buf, v);
        }
        for _ in 0..8 {
            put_u32(&mut buf, 0);
        }
        buf.push(u8::from(self.reciprocal));
        buf.push(u8::from(self.signed));
        buf.push(u8::from(self.difference));
        buf.push(u8::from(self.percent));
        put_i32(&mut buf, self.size.0);
        put_i32(&mut buf, self.size.1);
        put_i32(&mut buf, 0);
        put_i32(&mut buf, 0);
        put_i32(&mut buf, self.precision);
        put_string(&mut buf, &self.description);
        put_string(&mut buf, &self.units);
        put_f64(&mut buf, self.factor);
        put_f64(&mut buf, self.offset);
        put_u32(&mut buf, self.extent[0]);
        put_u32(&mut buf, self.extent[1]);
        for _ in 0..2 {
            put_u32(&mut buf, 0);
        }
        for _ in 0..2 {
            put_i32(&mut buf, 0);
        }
        put_u32(&mut buf, u32::MAX);
        put_i32(&mut buf, 2);
        self.x_axis.encode_into(&mut buf);
        self.y_axis.encode_into(&mut buf);
        // trailer
        put_i32(&mut buf, 0);
        buf.extend_from_slice(&[0u8; 2]);
        for _ in 0..8 {
            put_i32(&mut buf, 0);
        }
        buf.extend_from_slice(&[0u8; 2]);
        put_i32(&mut buf, 0);
        buf.push(0);
        for _ in 0..8 {
            put_u32(&mut buf, 0);
        }
        buf.extend_from_slice(&[0u8; 3]);
        buf
    }
}
