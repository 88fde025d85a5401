use rand::seq::SliceRandom;
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Beatriz", "Bruna", "Camila", "Carla", "Carolina", "Cecília", "Clara",
    "Daniela", "Eduarda", "Fernanda", "Gabriela", "Helena", "Isabela", "Júlia", "Larissa",
    "Letícia", "Luana", "Mariana", "Natália", "Patrícia", "Rafaela", "Sofia", "Vitória",
    "André", "Antônio", "Bruno", "Caio", "Carlos", "Daniel", "Diego", "Eduardo",
    "Felipe", "Gabriel", "Guilherme", "Gustavo", "Henrique", "Igor", "João", "José",
    "Leonardo", "Lucas", "Marcelo", "Mateus", "Paulo", "Pedro", "Rafael", "Thiago",
];

const SURNAMES: &[&str] = &[
    "Almeida", "Alves", "Andrade", "Araújo", "Barbosa", "Barros", "Cardoso", "Carvalho",
    "Castro", "Costa", "Cunha", "Dias", "Duarte", "Farias", "Fernandes", "Ferreira",
    "Freitas", "Gomes", "Gonçalves", "Lima", "Lopes", "Machado", "Martins", "Melo",
    "Mendes", "Monteiro", "Moraes", "Moreira", "Nascimento", "Nunes", "Oliveira", "Pereira",
    "Pinto", "Ramos", "Reis", "Ribeiro", "Rocha", "Rodrigues", "Santos", "Silva",
    "Soares", "Souza", "Teixeira", "Vieira",
];

/// Draws a pool of unique customer names
///
/// Sales draw their customer from this pool, so the same customer shows up
/// on several sales. Asking for more names than there are combinations
/// yields every combination once.
pub fn customer_pool<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Vec<String> {
    let mut names = FIRST_NAMES
        .iter()
        .flat_map(|first| SURNAMES.iter().map(move |last| format!("{first} {last}")))
        .collect::<Vec<_>>();

    if size > names.len() {
        tracing::warn!(
            requested = size,
            available = names.len(),
            "customer pool capped by the available name combinations"
        );
    }

    names.shuffle(rng);
    names.truncate(size);
    names
}
