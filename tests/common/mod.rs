#![allow(dead_code)]

/// Box with a plain 32-bit header.
pub fn bx(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&((payload.len() + 8) as u32).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

/// Box using the size=1 / 64-bit size header.
pub fn bx64(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&1u32.to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(&((payload.len() + 16) as u64).to_be_bytes());
    v.extend_from_slice(payload);
    v
}

pub fn container(typ: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    bx(typ, &children.concat())
}

/// ftyp: size=24, major brand "isom", minor 512, one compatible brand.
pub fn ftyp() -> Vec<u8> {
    let mut p = Vec::new();
    p.extend_from_slice(b"isom");
    p.extend_from_slice(&512u32.to_be_bytes());
    p.extend_from_slice(b"isom");
    bx(b"ftyp", &p)
}

/// meta box of exactly `total` bytes, header included.
pub fn meta(total: usize) -> Vec<u8> {
    let mut p = vec![0u8; 4]; // version/flags
    p.resize(total - 8, 0xAB);
    bx(b"meta", &p)
}

pub fn stco(entries: &[u32]) -> Vec<u8> {
    let mut p = vec![0u8; 4];
    p.extend_from_slice(&(entries.len() as u32).to_be_bytes());
    for e in entries {
        p.extend_from_slice(&e.to_be_bytes());
    }
    bx(b"stco", &p)
}

pub fn co64(entries: &[u64]) -> Vec<u8> {
    let mut p = vec![0u8; 4];
    p.extend_from_slice(&(entries.len() as u32).to_be_bytes());
    for e in entries {
        p.extend_from_slice(&e.to_be_bytes());
    }
    bx(b"co64", &p)
}

pub fn mdat(len: usize) -> Vec<u8> {
    bx(b"mdat", &(0..len).map(|i| i as u8).collect::<Vec<_>>())
}

/// trak > mdia > minf > stbl > [stsz, stco]
pub fn trak(stco_box: Vec<u8>) -> Vec<u8> {
    let stsz = bx(b"stsz", &[0u8; 12]);
    let stbl = container(b"stbl", &[stsz, stco_box]);
    let minf = container(b"minf", &[bx(b"vmhd", &[0u8; 12]), stbl]);
    let mdia = container(b"mdia", &[bx(b"mdhd", &[0u8; 24]), minf]);
    container(b"trak", &[bx(b"tkhd", &[0u8; 84]), mdia])
}

pub fn size_at(bytes: &[u8], pos: usize) -> u32 {
    u32::from_be_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
}
