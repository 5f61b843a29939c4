use chandra_ocr::*;
use image::{Rgb, RgbImage};

#[test]
#[ignore = "downloads the model from the Hugging Face hub"]
fn loaded_model_runs_on_cpu() {
    _ = tracing_subscriber::fmt::try_init();
    let mut events = Vec::new();
    let mut model = Ocr::builder()
        .build_with_loading_handler(|progress| events.push(progress))
        .unwrap();

    assert!(model.device().is_cpu());
    assert!(OcrPipeline::device(&model).is_cpu());
    assert_eq!(model.dtype(), candle_core::DType::F32);
    assert_eq!(events.last(), Some(&ModelLoadingProgress::loading(1.)));

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("white.png");
    RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]))
        .save(&input)
        .unwrap();

    let first = process_file(&input, dir.path(), &mut model).unwrap();
    let second = process_file(&input, dir.path(), &mut model).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("white.md")).unwrap(),
        second
    );
}

#[test]
fn missing_local_weights_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let tokenizer = dir.path().join("tokenizer.json");
    let source = OcrSource::default()
        .with_tokenizer(FileSource::local(&tokenizer))
        .with_model(FileSource::local(dir.path().join("model.safetensors")));

    let result = Ocr::builder()
        .with_source(source)
        .with_cache(Cache::new(dir.path().to_path_buf()))
        .build_with_loading_handler(|_| {});

    assert!(matches!(
        result,
        Err(OcrLoadingError::Download(CacheError::MissingLocalFile(path))) if path == tokenizer
    ));
}
