use rand::Rng;

pub const SALT_CHARSET: [char; 64] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L',
    'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4',
    '5', '6', '7', '8', '9', '-', '_',
];

pub fn generate_salt(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut salt = String::with_capacity(length);
    for _ in 0..length {
        salt.push(SALT_CHARSET[rng.gen_range(0..SALT_CHARSET.len())]);
    }
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salt_has_requested_length_and_charset() {
        let salt = generate_salt(32);
        assert_eq!(salt.len(), 32);
        assert!(salt.chars().all(|c| SALT_CHARSET.contains(&c)));
        assert_ne!(generate_salt(32), generate_salt(32));
    }
}
