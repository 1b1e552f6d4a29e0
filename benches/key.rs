#![feature(test)]

extern crate test;

use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use scrypt_rsa::{generate_keys, DigestValue, PrivateKey, PublicKey};
use sha2::Sha256;
use test::Bencher;

fn key_pair() -> (PublicKey, PrivateKey) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    generate_keys(&mut rng).unwrap()
}

#[bench]
fn bench_rsa_1024_gen_key(b: &mut Bencher) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);

    b.iter(|| {
        let keys: (PublicKey<1024>, PrivateKey<1024>) = generate_keys(&mut rng).unwrap();
        test::black_box(keys);
    });
}

#[bench]
fn bench_rsa_2048_gen_key(b: &mut Bencher) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);

    b.iter(|| {
        let keys: (PublicKey, PrivateKey) = generate_keys(&mut rng).unwrap();
        test::black_box(keys);
    });
}

#[bench]
fn bench_rsa_2048_decrypt(b: &mut Bencher) {
    let (public_key, private_key) = key_pair();
    let mut rng = ChaCha8Rng::from_seed([7; 32]);
    let ciphertext = public_key.encrypt(&mut rng, b"testing").unwrap();

    b.iter(|| {
        let res = private_key.decrypt(&ciphertext).unwrap();
        test::black_box(res);
    });
}

#[bench]
fn bench_rsa_2048_sign(b: &mut Bencher) {
    let (_, private_key) = key_pair();
    let digest = DigestValue::<Sha256>::digest(b"testing");

    b.iter(|| {
        let res = private_key.sign(&digest).unwrap();
        test::black_box(res);
    });
}

#[bench]
fn bench_rsa_2048_sign_blinded(b: &mut Bencher) {
    let (_, private_key) = key_pair();
    let digest = DigestValue::<Sha256>::digest(b"testing");
    let mut rng = ChaCha8Rng::from_seed([42; 32]);

    b.iter(|| {
        let res = private_key.sign_with_rng(&mut rng, &digest).unwrap();
        test::black_box(res);
    });
}

#[bench]
fn bench_rsa_2048_verify(b: &mut Bencher) {
    let (public_key, private_key) = key_pair();
    let digest = DigestValue::<Sha256>::digest(b"testing");
    let signature = private_key.sign(&digest).unwrap();

    b.iter(|| {
        test::black_box(public_key.verify(&digest, &signature));
    });
}
